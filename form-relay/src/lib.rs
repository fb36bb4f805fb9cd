//! Form Relay - contact form to email relay.
//!
//! Accepts contact form submissions over HTTP and forwards each one as an
//! email to a fixed recipient through an authenticated SMTP relay.
//!
//! ## Architecture
//!
//! ```text
//! Browser → origin guard → POST /contact → validate → compose → SMTP relay
//! ```

pub mod config;
pub mod contact;
pub mod mail;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use contact::{compose, ContactEmail, ContactRequest, ContactSubmission};
pub use mail::{check_transport, MailError, MailTransport, SmtpMailer};
pub use web::{router, AppState};
