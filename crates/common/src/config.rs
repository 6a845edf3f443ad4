use serde::Deserialize;

use crate::error::AppError;

/// Default SMTP port (upgrade-TLS submission).
pub const DEFAULT_EMAIL_PORT: u16 = 587;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub mail: MailConfig,
}

/// Issue tracker connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the tracker, without trailing slash
    pub base_url: String,

    /// User for basic authentication
    pub user: String,

    /// API token: basic-auth password, or bearer token on retry
    pub token: String,

    /// Address that receives every notification when set
    pub leader_email: Option<String>,
}

/// Outbound mail settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP host; `None` when unset or blank
    pub host: Option<String>,

    /// SMTP port (default: 587)
    pub port: u16,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Sender address (default: the SMTP username)
    pub from: Option<String>,

    /// Log previews instead of sending (default: true)
    pub dry_run: bool,

    /// Verbose SMTP protocol logging
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            non_blank(lookup(key))
                .ok_or_else(|| anyhow::anyhow!("{key} environment variable is required"))
        };

        let tracker = TrackerConfig {
            base_url: require("JIRA_URL")?.trim_end_matches('/').to_string(),
            user: require("JIRA_USER")?,
            token: require("JIRA_TOKEN")?,
            leader_email: non_blank(lookup("JIRA_LEADER")),
        };

        let username = non_blank(lookup("EMAIL_USER"));
        let mail = MailConfig {
            host: non_blank(lookup("EMAIL_HOST")),
            port: match non_blank(lookup("EMAIL_PORT")) {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("EMAIL_PORT must be a valid u16"))?,
                None => DEFAULT_EMAIL_PORT,
            },
            from: non_blank(lookup("EMAIL_FROM")).or_else(|| username.clone()),
            username,
            password: lookup("EMAIL_PASS").filter(|p| !p.is_empty()),
            dry_run: lookup("EMAIL_DRY_RUN").map(|v| is_truthy(&v)).unwrap_or(true),
            debug: lookup("EMAIL_DEBUG").map(|v| is_truthy(&v)).unwrap_or(false),
        };

        Ok(Self { tracker, mail })
    }
}

impl MailConfig {
    /// Reject configurations that could never deliver.
    ///
    /// A missing host is only acceptable in dry-run mode.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.host.is_none() {
            if !self.dry_run {
                return Err(AppError::Config(
                    "EMAIL_HOST is not configured. Set EMAIL_HOST to your SMTP server host \
                     (e.g. smtp.example.com) or enable EMAIL_DRY_RUN"
                        .to_string(),
                ));
            }
            tracing::warn!("EMAIL_HOST is not set; running in dry-run mode, no email will be sent");
        }

        if self.debug {
            tracing::info!("EMAIL_DEBUG enabled, SMTP protocol will be logged");
        }

        Ok(())
    }
}

/// Trim a value and treat an empty result as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
