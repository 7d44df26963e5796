//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

/// Minimum accepted JWT secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Session token lifetime (1 hour)
    pub token_ttl: Duration,
    /// `iss` claim written on issue and required on verify
    pub issuer: Option<String>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            token_ttl: Duration::from_secs(3600),
            issuer: None,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Config with a given secret and default lifetime.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self::new(platform::crypto::random_bytes(MIN_JWT_SECRET_LEN))
    }

    /// Development config. Tokens do not survive a restart.
    pub fn development() -> Self {
        Self {
            issuer: Some("livestock-dev".to_string()),
            ..Self::with_random_secret()
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    /// Whether the signing secret is long enough for HS256.
    pub fn has_strong_secret(&self) -> bool {
        self.jwt_secret.len() >= MIN_JWT_SECRET_LEN
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("issuer", &self.issuer)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
