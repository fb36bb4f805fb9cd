//! Contact form payload and validation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw contact form body as posted by the browser.
///
/// Every field is optional here; a value that is not a JSON string is
/// treated as missing so that `{"firstName": 42}` fails validation rather
/// than deserialization. `phone` also accepts a JSON number.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "phone_as_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Phone numbers are often posted as JSON numbers; render those as text.
fn phone_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A submission whose required fields are all present and non-blank.
///
/// Values are kept exactly as submitted; trimming only decides emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

/// Validation failure listing the required fields that were missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct MissingFields {
    pub missing: Vec<&'static str>,
}

impl ContactRequest {
    /// Parse a request body, treating anything unparseable as an empty form.
    pub fn from_json_slice(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Check the required fields and produce a [`ContactSubmission`].
    pub fn validate(self) -> Result<ContactSubmission, MissingFields> {
        let mut missing = Vec::new();

        let first_name = take_required(self.first_name, "firstName", &mut missing);
        let last_name = take_required(self.last_name, "lastName", &mut missing);
        let email = take_required(self.email, "email", &mut missing);
        let message = take_required(self.message, "message", &mut missing);

        match (first_name, last_name, email, message) {
            (Some(first_name), Some(last_name), Some(email), Some(message)) => {
                Ok(ContactSubmission {
                    first_name,
                    last_name,
                    email,
                    phone: self.phone.filter(|p| !p.is_empty()),
                    message,
                })
            }
            _ => Err(MissingFields { missing }),
        }
    }
}

fn take_required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> ContactRequest {
        ContactRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 7946 0000".to_string()),
            message: Some("Hello there".to_string()),
        }
    }

    #[test]
    fn test_validate_full_request() {
        let submission = full_request().validate().unwrap();
        assert_eq!(submission.first_name, "Ada");
        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.phone.as_deref(), Some("+44 20 7946 0000"));
    }

    #[test]
    fn test_validate_keeps_values_untrimmed() {
        let mut request = full_request();
        request.first_name = Some("  Ada ".to_string());
        let submission = request.validate().unwrap();
        assert_eq!(submission.first_name, "  Ada ");
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let request = ContactRequest {
            first_name: None,
            last_name: Some("".to_string()),
            email: Some(" \t\n".to_string()),
            phone: None,
            message: Some("hi".to_string()),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.missing, vec!["firstName", "lastName", "email"]);
        assert_eq!(
            err.to_string(),
            "missing required fields: firstName, lastName, email"
        );
    }

    #[test]
    fn test_validate_blank_message() {
        let mut request = full_request();
        request.message = Some("   ".to_string());
        assert_eq!(request.validate().unwrap_err().missing, vec!["message"]);
    }

    #[test]
    fn test_phone_is_optional() {
        let mut request = full_request();
        request.phone = None;
        assert_eq!(request.validate().unwrap().phone, None);

        let mut request = full_request();
        request.phone = Some(String::new());
        assert_eq!(request.validate().unwrap().phone, None);
    }

    #[test]
    fn test_from_json_slice_camel_case() {
        let body = br#"{
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "message": "line1\nline2",
            "extra": "ignored"
        }"#;
        let request = ContactRequest::from_json_slice(body);
        assert_eq!(request.first_name.as_deref(), Some("Ada"));
        assert_eq!(request.message.as_deref(), Some("line1\nline2"));
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_from_json_slice_non_string_values_are_missing() {
        let body = br#"{
            "firstName": 42,
            "lastName": null,
            "email": ["ada@example.com"],
            "phone": true,
            "message": {"text": "hi"}
        }"#;
        let request = ContactRequest::from_json_slice(body);
        assert_eq!(request.first_name, None);
        assert_eq!(request.last_name, None);
        assert_eq!(request.email, None);
        assert_eq!(request.phone, None);
        assert_eq!(request.message, None);
    }

    #[test]
    fn test_from_json_slice_numeric_phone_is_text() {
        let body = br#"{"firstName": "Ada", "phone": 5551234}"#;
        let request = ContactRequest::from_json_slice(body);
        assert_eq!(request.phone.as_deref(), Some("5551234"));
    }

    #[test]
    fn test_from_json_slice_garbage_is_empty() {
        let request = ContactRequest::from_json_slice(b"{not json");
        assert!(request.first_name.is_none());
        assert_eq!(request.validate().unwrap_err().missing.len(), 4);

        let request = ContactRequest::from_json_slice(b"[1, 2, 3]");
        assert!(request.email.is_none());
    }
}
