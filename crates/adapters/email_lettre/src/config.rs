//! SMTP transport configuration.

use serde::Deserialize;

/// Connection and sender-identity settings for the SMTP dispatcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP relay hostname.
    pub host: String,
    /// SMTP port (STARTTLS).
    pub port: u16,
    /// Relay username; usually the sending address.
    pub username: String,
    pub password: String,
    /// Display name on the `From:` header.
    pub from_name: String,
    /// Sending address on the `From:` header.
    pub from_address: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_name: "CoachHub".to_string(),
            from_address: "coach@example.com".to_string(),
        }
    }
}

impl SmtpConfig {
    /// The full `From:` mailbox string, e.g. `"Jane Coach <jane@example.com>"`.
    #[must_use]
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}
