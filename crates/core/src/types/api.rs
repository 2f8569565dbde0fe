//! Remote API error payloads.

use serde::Deserialize;

/// Body returned by the remote API on non-success responses.
///
/// User and auth endpoints answer with `{ "message": ... }`, the
/// subscription endpoint with `{ "error": ... }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, treating anything unparseable as empty.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// The server-provided message, or `default` when none was sent.
    #[must_use]
    pub fn message_or(self, default: &str) -> String {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_preferred_over_error() {
        let body = ApiErrorBody::from_text(r#"{"message":"Invalid credentials","error":"x"}"#);
        assert_eq!(body.message_or("Failed to login"), "Invalid credentials");
    }

    #[test]
    fn test_error_field_used() {
        let body = ApiErrorBody::from_text(r#"{"error":"Already subscribed"}"#);
        assert_eq!(body.message_or("Subscription failed."), "Already subscribed");
    }

    #[test]
    fn test_default_on_garbage() {
        let body = ApiErrorBody::from_text("<html>502</html>");
        assert_eq!(body.message_or("Failed to login"), "Failed to login");

        let blank = ApiErrorBody::from_text(r#"{"message":"  "}"#);
        assert_eq!(blank.message_or("Failed to register"), "Failed to register");
    }
}
