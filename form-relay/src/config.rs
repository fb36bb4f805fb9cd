//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`] that is
//! handed to the mailer and the web state.

use std::env;
use std::str::FromStr;

use tracing::warn;
use url::Url;

/// Origin allowed by default when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://portfolio-naciimas.vercel.app";

/// Default request body cap (200 KiB). Contact forms are tiny.
pub const DEFAULT_BODY_LIMIT: usize = 200 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Mail account used both as the envelope sender and the SMTP username
    pub email_user: String,

    /// App-specific password for `email_user`
    pub email_pass: String,

    /// Fixed recipient for every submission
    pub to_email: String,

    /// SMTP relay host (implicit TLS)
    pub smtp_host: String,

    /// Optional SMTP port override; the relay default is used otherwise
    pub smtp_port: Option<u16>,

    /// Connect with implicit TLS. Off only for local test servers (MailDev)
    pub smtp_tls: bool,

    /// Port for the web server to listen on
    pub port: u16,

    /// Origins permitted to call the API from a browser, normalized
    pub allowed_origins: Vec<String>,

    /// Maximum accepted request body size in bytes
    pub body_limit: usize,

    /// Escape user input before inserting it into the HTML body
    pub escape_html: bool,

    /// Include the transport diagnostic in 500 responses
    pub expose_send_errors: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            email_user: required("EMAIL_USER"),

            email_pass: required("EMAIL_PASS"),

            to_email: required("TO_EMAIL"),

            smtp_host: env::var("SMTP_HOST")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "smtp.gmail.com".to_string()),

            smtp_port: env::var("SMTP_PORT").ok().and_then(|raw| {
                let parsed = raw.trim().parse().ok();
                if parsed.is_none() {
                    warn!(env_var = "SMTP_PORT", value = %raw, "Invalid port, using relay default");
                }
                parsed
            }),

            smtp_tls: parse_flag("SMTP_TLS", true),

            port: parse_or("PORT", 5050),

            allowed_origins: parse_origins(
                "ALLOWED_ORIGINS",
                &[DEFAULT_ALLOWED_ORIGIN.to_string()],
            ),

            body_limit: parse_or("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT),

            escape_html: parse_flag("ESCAPE_HTML", false),

            expose_send_errors: parse_flag("EXPOSE_SEND_ERRORS", false),
        }
    }

    /// Whether an `Origin` header value is on the allow-list.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

/// Read a variable the service cannot work without.
///
/// A missing value is not fatal: the startup SMTP check reports it and each
/// send fails on its own.
fn required(name: &str) -> String {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => {
            warn!(env_var = name, "Required variable not set, sends will fail");
            String::new()
        }
    }
}

/// Parse a value with `FromStr`, falling back to `default`.
fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
fn parse_flag(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid flag, using default");
            default
        }
    }
}

/// Parse a comma-separated list of origins.
fn parse_origins(name: &str, default: &[String]) -> Vec<String> {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default.to_vec(),
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let origin = normalize_origin(s);
            if origin.is_none() {
                warn!(env_var = name, value = %s, "Invalid origin, skipping");
            }
            origin
        })
        .collect()
}

/// Reduce a URL to the `scheme://host[:port]` form browsers send in `Origin`.
pub fn normalize_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}
