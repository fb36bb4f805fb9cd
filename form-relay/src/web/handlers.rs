//! HTTP endpoint handlers.
//!
//! `POST /contact` ends in exactly one of three outcomes:
//! 1. 400 when required fields are missing (no send attempted)
//! 2. 500 when the mail transport fails
//! 3. 200 when the message was handed to the provider

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::contact::{compose, ContactRequest};
use crate::mail::MailTransport;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn new(config: Config, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            config: Arc::new(config),
            mailer,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Liveness endpoint. Does not touch the mail transport.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// =============================================================================
// Contact Form
// =============================================================================

pub const MSG_SENT: &str = "Message Sent!";
pub const MSG_MISSING_FIELDS: &str = "Missing required fields.";
pub const MSG_SEND_FAILED: &str = "Email failed";

/// Contact endpoint response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: MSG_SENT,
            error: None,
        }
    }

    pub fn failure(message: &'static str) -> Self {
        Self {
            success: false,
            message,
            error: None,
        }
    }
}

/// Contact form endpoint.
///
/// The body is read as raw bytes so the size cap applies before any
/// parsing. A non-JSON or malformed body counts as an empty form.
pub async fn contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = if is_json(&headers) {
        ContactRequest::from_json_slice(&body)
    } else {
        ContactRequest::default()
    };

    info!(
        body_length = body.len(),
        has_phone = request.phone.is_some(),
        message_length = request.message.as_ref().map(|m| m.len()).unwrap_or(0),
        "contact_received"
    );

    let submission = match request.validate() {
        Ok(submission) => submission,
        Err(e) => {
            warn!(missing = ?e.missing, "contact_validation_failed");
            return (
                StatusCode::BAD_REQUEST,
                Json(ContactResponse::failure(MSG_MISSING_FIELDS)),
            );
        }
    };

    let email = compose(
        &submission,
        &state.config.email_user,
        &state.config.to_email,
        state.config.escape_html,
    );

    if let Err(e) = state.mailer.send(email).await {
        error!(error = %e, reply_to = %submission.email, "contact_send_failed");

        let mut response = ContactResponse::failure(MSG_SEND_FAILED);
        if state.config.expose_send_errors {
            response.error = Some(e.to_string());
        }
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(response));
    }

    info!(reply_to = %submission.email, "contact_sent");

    (StatusCode::OK, Json(ContactResponse::sent()))
}

/// `application/json` or any `+json` media type.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(&headers_with("application/json")));
        assert!(is_json(&headers_with("application/json; charset=utf-8")));
        assert!(is_json(&headers_with("Application/JSON")));
        assert!(is_json(&headers_with("application/merge-patch+json")));
        assert!(!is_json(&headers_with("text/plain")));
        assert!(!is_json(&headers_with("application/x-www-form-urlencoded")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn test_contact_response_serialization() {
        let sent = serde_json::to_value(ContactResponse::sent()).unwrap();
        assert_eq!(sent, serde_json::json!({"success": true, "message": "Message Sent!"}));

        let mut failed = ContactResponse::failure(MSG_SEND_FAILED);
        failed.error = Some("boom".to_string());
        let failed = serde_json::to_value(failed).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"success": false, "message": "Email failed", "error": "boom"})
        );
    }
}
