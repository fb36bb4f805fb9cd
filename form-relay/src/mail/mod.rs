//! Outbound mail delivery.
//!
//! The web layer only sees [`MailTransport`]; [`SmtpMailer`] is the
//! production implementation backed by an authenticated SMTP relay.

pub mod smtp;

use async_trait::async_trait;
use tracing::{error, info};

use crate::contact::ContactEmail;

pub use smtp::SmtpMailer;

/// Errors raised while building or delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid {field} address {value:?}: {source}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("rejected: {0}")]
    Rejected(String),
}

/// A mail delivery backend shared by all requests.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Check credentials and connectivity.
    async fn verify(&self) -> Result<(), MailError>;

    /// Deliver one message. Called at most once per submission.
    async fn send(&self, email: ContactEmail) -> Result<(), MailError>;
}

/// Run the one-time startup check and report whether the transport is ready.
///
/// Never fails: a broken transport is logged and the service keeps serving,
/// with each send failing on its own.
pub async fn check_transport(mailer: &dyn MailTransport) -> bool {
    match mailer.verify().await {
        Ok(()) => {
            info!("smtp_ready");
            true
        }
        Err(e) => {
            error!(error = %e, "smtp_verify_failed");
            false
        }
    }
}
