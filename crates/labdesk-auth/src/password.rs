use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AuthError;

pub const DEFAULT_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 16;
pub const HASH_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

/// Password hashing capability. Swappable without touching call sites.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, AuthError>;

    /// `false` for a wrong password and for an unreadable stored hash.
    fn verify(&self, plain: &str, stored: &str) -> bool;
}

/// Salted PBKDF2-HMAC-SHA256.
///
/// Hashes are stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with
/// unpadded base64 segments, so the work factor can be raised without
/// invalidating existing hashes.
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    iterations: u32,
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl Pbkdf2Hasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }
}

fn derive(plain: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(plain.as_bytes(), salt, iterations, &mut out);
    out
}

struct ParsedHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn parse(stored: &str) -> Result<ParsedHash, AuthError> {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(AuthError::MalformedHash);
    };

    Ok(ParsedHash {
        iterations: iterations.parse().map_err(|_| AuthError::MalformedHash)?,
        salt: STANDARD_NO_PAD
            .decode(salt)
            .map_err(|_| AuthError::MalformedHash)?,
        hash: STANDARD_NO_PAD
            .decode(hash)
            .map_err(|_| AuthError::MalformedHash)?,
    })
}

impl PasswordHasher for Pbkdf2Hasher {
    fn hash(&self, plain: &str) -> Result<String, AuthError> {
        if plain.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        let hash = derive(plain, &salt, self.iterations);

        Ok(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        ))
    }

    fn verify(&self, plain: &str, stored: &str) -> bool {
        let Ok(parsed) = parse(stored) else {
            return false;
        };
        if parsed.iterations == 0 || parsed.hash.len() != HASH_LENGTH {
            return false;
        }

        let candidate = derive(plain, &parsed.salt, parsed.iterations);
        candidate.as_slice().ct_eq(parsed.hash.as_slice()).into()
    }
}
