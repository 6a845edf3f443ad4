use lettre::Message;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;

use reminder_common::config::MailConfig;
use reminder_common::error::AppError;
use reminder_common::types::NotificationPayload;

use crate::plan::delivery_plan;
use crate::transport::{MailTransport, SmtpTransport};

/// What happened to a message that didn't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Dry-run: only a preview was logged.
    DryRun,
}

impl Delivery {
    pub fn is_sent(self) -> bool {
        self == Delivery::Sent
    }
}

/// Delivers notifications to a single recipient at a time.
pub struct Mailer<T = SmtpTransport> {
    transport: T,
    host: Option<String>,
    port: u16,
    from: Option<String>,
    dry_run: bool,
}

impl Mailer<SmtpTransport> {
    pub fn from_config(config: &MailConfig) -> Self {
        Self::with_transport(config, SmtpTransport::new(config))
    }
}

impl<T: MailTransport> Mailer<T> {
    pub fn with_transport(config: &MailConfig, transport: T) -> Self {
        Self {
            transport,
            host: config.host.clone(),
            port: config.port,
            from: config.from.clone(),
            dry_run: config.dry_run,
        }
    }

    /// Send `payload` to `recipient`.
    ///
    /// In dry-run mode nothing touches the network and `Delivery::DryRun` is
    /// returned. Otherwise each strategy from [`delivery_plan`] is tried in
    /// order; if all fail, the last strategy's error is returned.
    pub async fn deliver(
        &self,
        payload: &NotificationPayload,
        recipient: &str,
    ) -> Result<Delivery, AppError> {
        if self.dry_run {
            tracing::info!(
                to = recipient,
                subject = %payload.subject,
                "Dry run, email preview:\n{}",
                payload.body
            );
            return Ok(Delivery::DryRun);
        }

        let host = self
            .host
            .as_deref()
            .ok_or_else(|| AppError::Config("EMAIL_HOST is not configured".to_string()))?;
        let message = self.build_message(payload, recipient)?;

        if let Err(e) = self.transport.probe(host, self.port).await {
            tracing::warn!(host, port = self.port, error = %e, "SMTP server unreachable");
        }

        let mut last_error = None;
        for attempt in delivery_plan(self.port) {
            match self.transport.send(host, attempt, message.clone()).await {
                Ok(()) => {
                    tracing::info!(to = recipient, %attempt, "Email sent");
                    return Ok(Delivery::Sent);
                }
                Err(e) => {
                    tracing::warn!(to = recipient, %attempt, error = %e, "SMTP attempt failed");
                    last_error = Some(e);
                }
            }
        }

        tracing::error!(to = recipient, "Failed to send email with every SMTP strategy");
        Err(last_error
            .unwrap_or_else(|| AppError::Mail("no SMTP strategy to try".to_string())))
    }

    fn build_message(
        &self,
        payload: &NotificationPayload,
        recipient: &str,
    ) -> Result<Message, AppError> {
        let from = self.from.as_deref().ok_or_else(|| {
            AppError::Config("EMAIL_FROM or EMAIL_USER is required to send email".to_string())
        })?;
        let from: Mailbox = from
            .parse()
            .map_err(|e| AppError::Validation(format!("invalid sender {from}: {e}")))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| AppError::Validation(format!("invalid recipient {recipient}: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(payload.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(payload.body.clone())
            .map_err(|e| AppError::Mail(format!("build message: {e}")))
    }
}
