use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("malformed password hash")]
    MalformedHash,
}
