//! Interpretation of error response bodies from the conversion service.

use serde::Deserialize;

/// Message shown when an error body carries nothing usable.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Structured error payload. The service sends `error`; `message` is
/// accepted as well.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Result of interpreting an error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// JSON object with a non-empty message field.
    Parsed(String),
    /// Body that is not JSON, used verbatim (trimmed).
    RawText(String),
    /// Empty body, or JSON without a message.
    Unknown,
}

impl ErrorBody {
    /// Try, in order: structured JSON, raw text, unknown.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<ErrorPayload>(body) {
            Ok(payload) => payload
                .error
                .or(payload.message)
                .filter(|m| !m.trim().is_empty())
                .map(ErrorBody::Parsed)
                .unwrap_or(ErrorBody::Unknown),
            Err(_) => {
                let text = body.trim();
                if text.is_empty() {
                    ErrorBody::Unknown
                } else {
                    ErrorBody::RawText(text.to_string())
                }
            }
        }
    }

    pub fn into_message(self) -> String {
        match self {
            ErrorBody::Parsed(message) | ErrorBody::RawText(message) => message,
            ErrorBody::Unknown => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}
