use crate::domain::error::DomainError;
use crate::domain::mailer::{Mailer, OutboundEmail};
use anyhow::Result;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, instrument, warn};

/// SMTP relay configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    /// Load from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`
    /// and `SMTP_FROM`. Returns `None` if any required variable is missing
    /// (outbound email degrades to logging).
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let username = std::env::var("SMTP_USERNAME").ok()?;
        let password = std::env::var("SMTP_PASSWORD").ok()?;
        let from = std::env::var("SMTP_FROM").ok()?;
        Some(Self {
            host,
            port,
            username,
            password,
            from,
        })
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| DomainError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| DomainError::Internal(format!("Failed to build SMTP transport: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| DomainError::EmailDelivery(format!("Invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.text)
            .map_err(|e| DomainError::EmailDelivery(format!("Failed to build message: {}", e)))?;

        debug!("Sending email through SMTP relay");
        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::EmailDelivery(e.to_string()))?;

        info!("Email accepted by relay");
        Ok(())
    }
}

/// Fallback mailer used when no SMTP relay is configured. Logs the message
/// instead of delivering it, so the reset flow stays exercisable locally.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<()> {
        warn!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured; logging email instead of sending"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_any_message() {
        let mailer = LogMailer;
        let result = mailer
            .send(OutboundEmail {
                to: "user@example.com".to_string(),
                subject: "Password Reset Request".to_string(),
                text: "Follow the instructions to reset your password.".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_smtp_mailer_rejects_invalid_from_address() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "relay-user".to_string(),
            password: "relay-pass".to_string(),
            from: "not an address".to_string(),
        };
        assert!(SmtpMailer::new(&config).is_err());
    }
}
