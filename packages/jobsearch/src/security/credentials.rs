//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of sensitive values.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{PipelineError, Result};

/// A secret string that won't be logged or displayed.
///
/// Wraps `secrecy::SecretBox` so provider API keys never show up in
/// `Debug` output, tracing events, or error messages.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this at the point of an outbound request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Read a required credential from the environment.
///
/// A missing variable is a configuration error, raised before any stage
/// executes.
pub fn require_env(name: &str) -> Result<SecretString> {
    std::env::var(name)
        .map(SecretString::new)
        .map_err(|_| PipelineError::config(format!("{name} environment variable not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_not_in_debug() {
        let secret = SecretString::new("sk-super-secret-key");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("sk-super"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn secret_not_in_display() {
        let secret = SecretString::new("sk-super-secret-key");
        let display = format!("{}", secret);
        assert!(!display.contains("sk-super"));
        assert!(display.contains("[REDACTED]"));
    }

    #[test]
    fn expose_works() {
        let secret = SecretString::new("sk-super-secret-key");
        assert_eq!(secret.expose(), "sk-super-secret-key");
    }

    #[test]
    fn missing_env_is_config_error() {
        let err = require_env("JOBSEARCH_TEST_KEY_THAT_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
        assert!(err
            .to_string()
            .contains("JOBSEARCH_TEST_KEY_THAT_DOES_NOT_EXIST"));
    }
}
