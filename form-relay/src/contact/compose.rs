//! Builds the outgoing email for a validated submission.

use super::ContactSubmission;

/// Display name on the envelope sender.
pub const SENDER_NAME: &str = "Portfolio Contact";

/// Subject line of every relayed message.
pub const SUBJECT: &str = "Contact Form Submission - Portfolio";

/// Rendered in place of a missing phone number.
pub const PHONE_PLACEHOLDER: &str = "(not provided)";

/// A composed message, independent of any mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// Compose the relay email for a submission.
///
/// The sender is always the service's own account so the provider's
/// sender verification passes; replies go to the submitter. With
/// `escape` off, user input is inserted into the markup verbatim.
pub fn compose(
    submission: &ContactSubmission,
    from_address: &str,
    to: &str,
    escape: bool,
) -> ContactEmail {
    let field = |value: &str| {
        if escape {
            escape_html(value)
        } else {
            value.to_string()
        }
    };

    let phone = submission
        .phone
        .as_deref()
        .map(|p| field(p))
        .unwrap_or_else(|| PHONE_PLACEHOLDER.to_string());

    // Newlines are converted after escaping so the <br/> stays markup.
    let message = field(&submission.message).replace('\n', "<br/>");

    let html = format!(
        "<p><strong>Name:</strong> {} {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n",
        field(&submission.first_name),
        field(&submission.last_name),
        field(&submission.email),
        phone,
        message,
    );

    ContactEmail {
        from_name: SENDER_NAME.to_string(),
        from_address: from_address.to_string(),
        to: to.to_string(),
        reply_to: submission.email.clone(),
        subject: SUBJECT.to_string(),
        html,
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            message: "line1\nline2".to_string(),
        }
    }

    #[test]
    fn test_compose_envelope() {
        let email = compose(&submission(), "me@example.com", "inbox@example.com", false);
        assert_eq!(email.from_name, "Portfolio Contact");
        assert_eq!(email.from_address, "me@example.com");
        assert_eq!(email.to, "inbox@example.com");
        assert_eq!(email.reply_to, "ada@example.com");
        assert_eq!(email.subject, "Contact Form Submission - Portfolio");
    }

    #[test]
    fn test_compose_body_fields() {
        let email = compose(&submission(), "me@example.com", "inbox@example.com", false);
        assert!(email.html.contains("<p><strong>Name:</strong> Ada Lovelace</p>"));
        assert!(email.html.contains("<p><strong>Email:</strong> ada@example.com</p>"));
        assert!(email.html.contains("<p>line1<br/>line2</p>"));
    }

    #[test]
    fn test_compose_phone_placeholder() {
        let email = compose(&submission(), "me@example.com", "inbox@example.com", false);
        assert!(email
            .html
            .contains("<p><strong>Phone:</strong> (not provided)</p>"));

        let mut with_phone = submission();
        with_phone.phone = Some("555-0100".to_string());
        let email = compose(&with_phone, "me@example.com", "inbox@example.com", false);
        assert!(email.html.contains("<p><strong>Phone:</strong> 555-0100</p>"));
        assert!(!email.html.contains(PHONE_PLACEHOLDER));
    }

    // Known gap: without escaping, submitted markup reaches the email as-is.
    #[test]
    fn test_compose_unescaped_by_default() {
        let mut s = submission();
        s.first_name = "<script>alert(1)</script>".to_string();
        s.message = "<b>bold</b>".to_string();
        let email = compose(&s, "me@example.com", "inbox@example.com", false);
        assert!(email.html.contains("<script>alert(1)</script>"));
        assert!(email.html.contains("<p><b>bold</b></p>"));
    }

    #[test]
    fn test_compose_escaped() {
        let mut s = submission();
        s.first_name = "<script>".to_string();
        s.phone = Some("\"555\"".to_string());
        s.message = "a & b\n<i>c</i>".to_string();
        let email = compose(&s, "me@example.com", "inbox@example.com", true);
        assert!(email.html.contains("Name:</strong> &lt;script&gt; Lovelace"));
        assert!(email.html.contains("Phone:</strong> &quot;555&quot;"));
        assert!(email.html.contains("<p>a &amp; b<br/>&lt;i&gt;c&lt;/i&gt;</p>"));
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }
}
