//! Configuration for the deskbridge client.
//!
//! This module handles client construction parameters, either supplied
//! directly or loaded from environment variables, with validation to ensure
//! all required values are present.

use std::env;

use crate::error::BridgeError;

/// Configuration for connecting to a helpdesk backend.
///
/// Fixed at construction; the client never mutates configuration after
/// creation. The API key is sent verbatim as the `Authorization` header
/// value (no scheme prefix) and must never be logged.
#[derive(Clone)]
pub struct Config {
    /// Base URL for the helpdesk instance (e.g., `https://acme.helprack.com`).
    pub base_url: String,

    /// API credential for authentication.
    /// This value must never be logged or included in error messages.
    pub api_key: String,

    /// Enables request-level debug logging on the client.
    pub verbose: bool,
}

impl Config {
    /// Creates a configuration from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Config` if the base URL or API key fail
    /// validation.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, BridgeError> {
        let base_url = Self::validate_base_url(base_url.into())?;
        let api_key = api_key.into();
        Self::validate_api_key(&api_key)?;

        Ok(Config {
            base_url,
            api_key,
            verbose: false,
        })
    }

    /// Sets the verbosity flag.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `DESKBRIDGE_BASE_URL`: Base URL of the helpdesk instance
    /// - `DESKBRIDGE_API_KEY`: API credential for authentication
    ///
    /// # Optional
    ///
    /// - `DESKBRIDGE_VERBOSE`: set to `1` or `true` to enable verbose logging
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Config` if any required variable is missing
    /// or if values fail validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, BridgeError> {
        let base_url = Self::get_required_env("DESKBRIDGE_BASE_URL")?;
        let api_key = Self::get_required_env("DESKBRIDGE_API_KEY")?;

        let verbose = env::var("DESKBRIDGE_VERBOSE")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE"))
            .unwrap_or(false);

        Ok(Self::new(base_url, api_key)?.with_verbose(verbose))
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, BridgeError> {
        env::var(name)
            .map_err(|_| BridgeError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(BridgeError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, BridgeError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BridgeError::config(
                "base URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }

    /// Validates the API key is not empty or a placeholder value.
    fn validate_api_key(key: &str) -> Result<(), BridgeError> {
        if key.trim().is_empty() {
            return Err(BridgeError::config("API key must not be empty"));
        }

        let key_lower = key.to_lowercase();
        let placeholder_patterns = ["your_api_key", "your_key", "placeholder", "xxx", "changeme"];

        for pattern in placeholder_patterns {
            if key_lower.contains(pattern) {
                return Err(BridgeError::config(
                    "API key appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_removes_trailing_slash() {
        let config = Config::new("https://acme.helprack.com/", "abc123").unwrap();
        assert_eq!(config.base_url, "https://acme.helprack.com");
        assert!(!config.verbose);
    }

    #[test]
    fn test_new_requires_scheme() {
        let result = Config::new("acme.helprack.com", "abc123");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_placeholder_key() {
        let result = Config::new("https://acme.helprack.com", "your_api_key_here");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = Config::new("https://acme.helprack.com", "   ");
        assert!(result.is_err());
    }

    #[test]
    fn test_with_verbose() {
        let config = Config::new("https://acme.helprack.com", "abc123")
            .unwrap()
            .with_verbose(true);
        assert!(config.verbose);
    }
}
