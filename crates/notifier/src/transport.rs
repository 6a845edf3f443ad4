use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::net::TcpStream;

use reminder_common::config::MailConfig;
use reminder_common::error::AppError;

use crate::plan::{Attempt, TlsMode};

/// Timeout for the bare TCP reachability check.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for each SMTP protocol operation.
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Network side of mail delivery.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Connect and immediately close, to surface network-level failures.
    async fn probe(&self, host: &str, port: u16) -> Result<(), AppError>;

    /// Run one full SMTP session for `message` using the given strategy.
    async fn send(&self, host: &str, attempt: Attempt, message: Message) -> Result<(), AppError>;
}

/// SMTP transport backed by lettre.
///
/// Each `send` opens a fresh session: greeting, TLS (implicit or via
/// `STARTTLS`), `AUTH`, one envelope, `QUIT`. lettre is built without its
/// connection pool, so the session is closed before `send` returns.
pub struct SmtpTransport {
    credentials: Option<Credentials>,
}

impl SmtpTransport {
    pub fn new(config: &MailConfig) -> Self {
        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => {
                tracing::warn!("EMAIL_USER or EMAIL_PASS not set, SMTP AUTH will be skipped");
                None
            }
        };
        Self { credentials }
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn probe(&self, host: &str, port: u16) -> Result<(), AppError> {
        match tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(AppError::Mail(format!("TCP connect {host}:{port}: {e}"))),
            Err(_) => Err(AppError::Mail(format!(
                "TCP connect {host}:{port}: timed out after {}s",
                PROBE_TIMEOUT.as_secs()
            ))),
        }
    }

    async fn send(&self, host: &str, attempt: Attempt, message: Message) -> Result<(), AppError> {
        tracing::debug!(host, %attempt, "Opening SMTP session");

        let builder = match attempt.mode {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
        }
        .map_err(|e| AppError::Mail(format!("{attempt}: TLS setup: {e}")))?;

        let mut builder = builder.port(attempt.port).timeout(Some(SMTP_TIMEOUT));
        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }

        builder
            .build()
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("{attempt}: {e}")))?;

        Ok(())
    }
}
