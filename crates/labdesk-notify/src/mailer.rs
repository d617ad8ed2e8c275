use std::future::Future;
use std::pin::Pin;

use crate::error::NotifyError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Mail transport capability.
pub trait Mailer: Send + Sync {
    fn send<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// Transport used when no sender address is configured. Every send fails
/// with [`NotifyError::Disabled`].
pub struct DisabledMailer;

impl Mailer for DisabledMailer {
    fn send<'a>(
        &'a self,
        _to: &'a str,
        _subject: &'a str,
        _body: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async { Err(NotifyError::Disabled) })
    }
}
