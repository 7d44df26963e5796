//! Bearer Token Extraction
//!
//! Reads `Authorization: Bearer <token>` from request headers.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Why a bearer token could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("No token provided")]
    Missing,
    #[error("Authorization header must use the Bearer scheme")]
    WrongScheme,
}

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme match is case-insensitive (RFC 7235); the token itself is
/// returned trimmed.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(BearerError::Missing)?;

    if value.len() < BEARER_PREFIX.len()
        || !value[..BEARER_PREFIX.len()].eq_ignore_ascii_case(BEARER_PREFIX)
    {
        return Err(BearerError::WrongScheme);
    }

    let token = value[BEARER_PREFIX.len()..].trim();
    if token.is_empty() {
        return Err(BearerError::Missing);
    }

    Ok(token)
}
