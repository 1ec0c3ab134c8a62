//! Client configuration — what every submission needs besides the request.

use captionkit_domain::DEFAULT_MAX_RESOURCE_BYTES;
use std::fmt;

/// Access credential for the analysis service.
///
/// Read-only for the lifetime of a client. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank input.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into().trim().to_string();
        (!secret.is_empty()).then_some(Self(secret))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Settings shared by every request a client submits
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer credential; submissions fail with `NoCredential` when absent
    pub credential: Option<Credential>,
    /// Backend used when a request carries no override
    pub default_backend: Option<String>,
    /// Size cap applied before a resource is encoded
    pub max_resource_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credential: None,
            default_backend: None,
            max_resource_bytes: DEFAULT_MAX_RESOURCE_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn with_credential(mut self, secret: impl Into<String>) -> Self {
        self.credential = Credential::new(secret);
        self
    }

    pub fn with_default_backend(mut self, backend: Option<String>) -> Self {
        self.default_backend = backend.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_max_resource_bytes(mut self, max: u64) -> Self {
        self.max_resource_bytes = max;
        self
    }
}
