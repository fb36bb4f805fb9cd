//! SMTP transport backed by lettre.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use super::{MailError, MailTransport};
use crate::contact::ContactEmail;
use crate::Config;

/// Authenticated SMTP relay client.
///
/// Holds connection settings and a pool; one instance is shared by every
/// request behind an `Arc`.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Build a client for `config.smtp_host`. No connection is made here.
    ///
    /// With TLS on, this is an implicit-TLS relay using the account
    /// credentials. With TLS off (local MailDev-style servers) the
    /// connection is plaintext and credentials are never sent.
    pub fn new(config: &Config) -> Result<Self, MailError> {
        let mut builder = if config.smtp_tls {
            let credentials =
                Credentials::new(config.email_user.clone(), config.email_pass.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?.credentials(credentials)
        } else {
            warn!(host = %config.smtp_host, "smtp_tls_disabled");
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_host.as_str())
        };

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            host: config.smtp_host.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), MailError> {
        info!(host = %self.host, "smtp_verify_start");
        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(MailError::Rejected(format!(
                "connection test to {} failed",
                self.host
            )))
        }
    }

    async fn send(&self, email: ContactEmail) -> Result<(), MailError> {
        let message = build_message(&email)?;
        // lettre turns every non-2xx reply into an error
        let response = self.transport.send(message).await?;

        info!(
            host = %self.host,
            code = %response.code(),
            "smtp_message_accepted"
        );

        Ok(())
    }
}

/// Convert a composed email into a lettre message with an HTML body.
pub fn build_message(email: &ContactEmail) -> Result<Message, MailError> {
    let from = Mailbox::new(
        Some(email.from_name.clone()),
        parse_address("from", &email.from_address)?,
    );
    let to = Mailbox::new(None, parse_address("to", &email.to)?);
    let reply_to = Mailbox::new(None, parse_address("reply-to", &email.reply_to)?);

    let message = Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())?;

    Ok(message)
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, MailError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|source| MailError::InvalidAddress {
            field,
            value: value.to_string(),
            source,
        })
}
