//! The backend's JSON response envelope.

use serde::Deserialize;

/// Every backend response follows `{ success, data?, message? }`.
///
/// Non-2xx responses carry the same shape; `message` holds the
/// human-readable failure reason when the backend provides one.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload, present on success.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Human-readable message, usually present on failure.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// The server message, or a fallback when none was supplied.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
