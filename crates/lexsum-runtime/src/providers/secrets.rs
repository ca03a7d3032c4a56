//! Secure credential handling for LLM providers.
//!
//! This module provides a type-safe way to hold API credentials. Using it
//! ensures:
//!
//! - **No accidental logging**: Credentials cannot appear in Debug/Display output
//! - **Memory safety**: Credentials are zeroed on drop
//! - **Explicit exposure**: The raw value is only reachable through `.expose()`
//!
//! ## Usage
//!
//! ```ignore
//! use crate::providers::secrets::ApiCredential;
//!
//! // Load from environment
//! let cred = ApiCredential::from_env("OPENAI_API_KEY", "OpenAI API key")?;
//!
//! // Use in HTTP header (explicit exposure)
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
///
/// Useful for debugging configuration issues without exposing the actual
/// credential value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
    /// Stand-in value for endpoints that skip authentication
    Placeholder,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
            CredentialSource::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// A securely-stored API credential.
///
/// This wrapper provides:
/// - Safe Debug implementation that shows `[REDACTED]`
/// - Memory zeroing on drop via the `secrecy` crate
/// - Explicit exposure via the `.expose()` method
/// - Source tracking for debugging
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Create a new credential from a string value.
    ///
    /// The value is immediately wrapped in SecretString and cannot be
    /// accidentally logged after this point.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load a credential from an environment variable.
    ///
    /// # Arguments
    /// * `env_var` - Name of the environment variable
    /// * `name` - Human-readable name for error messages (e.g., "OpenAI API key")
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        std::env::var(env_var)
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .map_err(|_| {
                ProviderError::NotConfigured(format!(
                    "{} not set: configure '{}' environment variable",
                    name, env_var
                ))
            })
    }

    /// Stand-in credential for endpoints that ignore the Authorization
    /// header, such as self-hosted OpenAI-compatible servers.
    pub fn placeholder(name: &'static str) -> Self {
        Self::new("placeholder", CredentialSource::Placeholder, name)
    }

    /// Expose the credential value for use in API calls.
    ///
    /// # Security
    ///
    /// Only call this at the point where the credential is actually needed
    /// (e.g., setting an HTTP header). Never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Get the source of this credential.
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Get the human-readable name of this credential.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}
