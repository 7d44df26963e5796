//! Authenticated caller
//!
//! The auth middleware verifies the bearer token and stores a
//! [`CurrentUser`] in the request extensions. Handlers in any crate extract
//! it without knowing how the token was verified.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::error::app_error::{AppError, AppResult};
use crate::id::UserId;

/// Identity carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: String,
}

impl CurrentUser {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Routes scoped by a user id in the path only serve the caller's own data.
    pub fn ensure_owner(&self, user_id: UserId) -> AppResult<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::forbidden("You do not have access to this user's data"))
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("No token provided"))
    }
}
