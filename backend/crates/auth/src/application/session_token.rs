//! Session Tokens
//!
//! Stateless HS256 JWTs. The subject is the user id as a decimal string;
//! the email rides along so handlers can log it without a lookup.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use kernel::session::CurrentUser;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens with one signing key.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    issuer: Option<String>,
}

impl SessionTokens {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            ttl_secs: i64::try_from(config.token_ttl.as_secs()).unwrap_or(i64::MAX),
            issuer: config.issuer.clone(),
        }
    }

    pub fn issue(&self, user_id: UserId, email: &str) -> AuthResult<IssuedToken> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if the clock read `now`.
    pub fn issue_at(
        &self,
        user_id: UserId,
        email: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let iat = now.timestamp();
        let exp = iat.saturating_add(self.ttl_secs);
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat,
            exp,
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| AuthError::Internal(format!("token expiry out of range: {exp}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, expiry and issuer, then map the claims to the caller.
    pub fn verify(&self, token: &str) -> AuthResult<CurrentUser> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AuthError::InvalidToken
            })?;

        let user_id = UserId::parse(&data.claims.sub).ok_or(AuthError::InvalidToken)?;
        Ok(CurrentUser::new(user_id, data.claims.email))
    }
}
