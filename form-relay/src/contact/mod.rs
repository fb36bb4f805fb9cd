//! Contact form handling.
//!
//! ## Flow
//!
//! ```text
//! request body → ContactRequest → validate() → ContactSubmission → compose() → ContactEmail
//! ```

pub mod compose;
pub mod submission;

pub use compose::{compose, escape_html, ContactEmail, PHONE_PLACEHOLDER, SENDER_NAME, SUBJECT};
pub use submission::{ContactRequest, ContactSubmission, MissingFields};
