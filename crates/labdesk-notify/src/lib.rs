//! labdesk-notify
//!
//! Best-effort email notifications. Delivery failures are logged and
//! reported as a degraded [`labdesk_core::outcome::Outcome`]; they never
//! reach the caller as errors.

pub mod error;
pub mod mailer;
pub mod messages;
pub mod notifier;
pub mod ses;
