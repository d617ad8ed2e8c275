use labdesk_auth::error::AuthError;
use labdesk_auth::password::{PasswordHasher, Pbkdf2Hasher};

fn hasher() -> Pbkdf2Hasher {
    Pbkdf2Hasher::new(1_000)
}

#[test]
fn correct_password_verifies() {
    let hash = hasher().hash("Secret1").unwrap();
    assert!(hash.starts_with("pbkdf2-sha256$1000$"));
    assert!(hasher().verify("Secret1", &hash));
}

#[test]
fn wrong_password_is_rejected() {
    let hash = hasher().hash("Secret1").unwrap();
    assert!(!hasher().verify("secret1", &hash));
    assert!(!hasher().verify("", &hash));
}

#[test]
fn hashes_are_salted() {
    let a = hasher().hash("Secret1").unwrap();
    let b = hasher().hash("Secret1").unwrap();
    assert_ne!(a, b);
}

#[test]
fn stored_iterations_are_honored() {
    let hash = Pbkdf2Hasher::new(2_000).hash("Secret1").unwrap();
    assert!(hasher().verify("Secret1", &hash));
}

#[test]
fn malformed_hashes_never_verify() {
    assert!(!hasher().verify("Secret1", ""));
    assert!(!hasher().verify("Secret1", "plaintext"));
    assert!(!hasher().verify("Secret1", "pbkdf2-sha256$x$AAAA$AAAA"));
    assert!(!hasher().verify("Secret1", "bcrypt$10$AAAA$AAAA"));
}

#[test]
fn empty_password_cannot_be_hashed() {
    assert!(matches!(hasher().hash(""), Err(AuthError::EmptyPassword)));
}
