//! Mail delivery for reminder notifications.
//!
//! Sends a composed [`NotificationPayload`] to one recipient over SMTP, trying
//! an ordered list of TLS strategies (see [`plan`]), or only logs a preview in
//! dry-run mode.
//!
//! [`NotificationPayload`]: reminder_common::types::NotificationPayload

pub mod mailer;
pub mod plan;
pub mod transport;

pub use mailer::{Delivery, Mailer};
pub use transport::{MailTransport, SmtpTransport};
