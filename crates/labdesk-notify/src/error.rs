use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail transport disabled: no sender address configured")]
    Disabled,

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("SES SendEmail error: {0}")]
    Send(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
