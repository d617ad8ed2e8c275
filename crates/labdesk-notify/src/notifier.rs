use std::sync::Arc;
use std::time::Duration;

use labdesk_core::outcome::Outcome;
use tracing::warn;

use crate::error::NotifyError;
use crate::mailer::Mailer;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fire-and-forget front for a [`Mailer`]. No retries.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one message. Failures are logged and returned as `Degraded`.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Outcome<()> {
        let result = tokio::time::timeout(self.timeout, self.mailer.send(to, subject, body))
            .await
            .unwrap_or(Err(NotifyError::Timeout(self.timeout)));

        match result {
            Ok(()) => Outcome::ok(()),
            Err(e) => {
                warn!(to, subject, error = %e, "email not sent");
                Outcome::degraded((), e.to_string())
            }
        }
    }
}
