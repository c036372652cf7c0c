//! Error types for the deskbridge client.
//!
//! This module defines `BridgeError`, the unified error type used throughout
//! the crate. The error taxonomy distinguishes network-level failures (no
//! response received) from HTTP errors carrying a response, and singles out
//! HTTP 405 as a known-limitation class: the Helprack backend rejects its own
//! documented PUT verb on some mutation endpoints, and the executor needs to
//! tell that apart from a genuine failure to apply its narrow fallback.

use thiserror::Error;

/// Maximum length for HTTP error body excerpts. Helprack error pages can be
/// full HTML documents; callers only ever need the first part.
pub(crate) const MAX_ERROR_BODY_LEN: usize = 300;

/// Unified error type for all deskbridge operations.
///
/// Each variant provides specific context about the failure. Wire codec
/// mapping never produces errors (its functions are total); every variant
/// here originates in configuration, transport, or the vendor's HTTP-level
/// behavior.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration error - missing or invalid construction parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission (no response received).
    #[error("network error: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    ///
    /// `body` holds the vendor-supplied message when the response was
    /// parseable, otherwise a truncated excerpt of the raw payload.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// Best-effort vendor message or payload excerpt.
        body: String,
    },

    /// The vendor rejected the documented HTTP verb with 405.
    ///
    /// For ticket assignment the executor retries via POST before surfacing
    /// this; everywhere else it is reported directly with guidance, since the
    /// backend simply does not support the operation over the API.
    #[error(
        "method not allowed for {operation}: {detail} - the Helprack backend \
         may not support this operation via the API; resolve it in the vendor console"
    )]
    MethodNotAllowed {
        /// The logical operation that was rejected (e.g., "close ticket").
        operation: String,
        /// Vendor-supplied detail, excerpted.
        detail: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The provider factory was given an identifier it does not know.
    #[error("unknown provider: {0:?} (supported: \"helprack\")")]
    UnknownProvider(String),
}

impl BridgeError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Config(message.into())
    }

    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        BridgeError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a method-not-allowed error for a logical operation.
    pub fn method_not_allowed(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        BridgeError::MethodNotAllowed {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Returns true if this error is the 405 known-limitation class that the
    /// executor's verb-fallback policy keys on.
    #[must_use]
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, BridgeError::MethodNotAllowed { .. })
    }

    /// Returns true if the failure happened before any response was received.
    ///
    /// Distinguishes connectivity problems (DNS, refused connection, timeout)
    /// from errors the server actively returned.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, BridgeError::Http(_))
    }

    /// Returns true if the error indicates rejected credentials (401/403).
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            BridgeError::HttpStatus { status, .. }
                if status.as_u16() == 401 || status.as_u16() == 403
        )
    }

    /// Extracts a human-readable message from a raw vendor error body.
    ///
    /// Helprack error responses are sometimes JSON with a `message` or
    /// `error` field and sometimes an HTML error page. When the body parses
    /// as JSON the vendor message is returned; otherwise a truncated excerpt
    /// of the raw payload.
    #[must_use]
    pub fn excerpt_body(body: &str) -> String {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            for field in ["message", "error"] {
                if let Some(msg) = json.get(field).and_then(|m| m.as_str()) {
                    return msg.to_string();
                }
            }
        }

        let trimmed = body.trim();
        if trimmed.is_empty() {
            return "(empty response body)".to_string();
        }
        if trimmed.len() > MAX_ERROR_BODY_LEN {
            let cut = trimmed
                .char_indices()
                .take_while(|(i, _)| *i < MAX_ERROR_BODY_LEN)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}...[truncated]", &trimmed[..cut])
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = BridgeError::missing_env("DESKBRIDGE_API_KEY");
        assert!(err.to_string().contains("DESKBRIDGE_API_KEY"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_config_error() {
        let err = BridgeError::config("base URL must use http or https");
        assert_eq!(
            err.to_string(),
            "configuration error: base URL must use http or https"
        );
    }

    #[test]
    fn test_method_not_allowed_classifier() {
        let err = BridgeError::method_not_allowed("close ticket", "405 Method Not Allowed");
        assert!(err.is_method_not_allowed());
        assert!(err.to_string().contains("close ticket"));
        assert!(err.to_string().contains("vendor console"));
    }

    #[test]
    fn test_http_status_not_method_not_allowed() {
        let err = BridgeError::HttpStatus {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "invalid filters".to_string(),
        };
        assert!(!err.is_method_not_allowed());
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_auth_failure_classifier() {
        for code in [401, 403] {
            let err = BridgeError::HttpStatus {
                status: reqwest::StatusCode::from_u16(code).unwrap(),
                body: "forbidden".to_string(),
            };
            assert!(err.is_auth_failure(), "status {} should classify as auth", code);
        }
    }

    #[test]
    fn test_excerpt_body_prefers_vendor_message() {
        let body = r#"{"message": "Ticket not found", "code": 404}"#;
        assert_eq!(BridgeError::excerpt_body(body), "Ticket not found");

        let body = r#"{"error": "bad ticket_count"}"#;
        assert_eq!(BridgeError::excerpt_body(body), "bad ticket_count");
    }

    #[test]
    fn test_excerpt_body_truncates_html() {
        let body = format!("<html><body>{}</body></html>", "x".repeat(1000));
        let excerpt = BridgeError::excerpt_body(&body);
        assert!(excerpt.len() < body.len());
        assert!(excerpt.ends_with("...[truncated]"));
    }

    #[test]
    fn test_excerpt_body_empty() {
        assert_eq!(BridgeError::excerpt_body("   "), "(empty response body)");
    }

    #[test]
    fn test_unknown_provider_message() {
        let err = BridgeError::UnknownProvider("zendesk".to_string());
        assert!(err.to_string().contains("zendesk"));
        assert!(err.to_string().contains("helprack"));
    }
}
