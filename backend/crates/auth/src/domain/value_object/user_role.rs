//! User role
//!
//! Roles are free-form labels chosen at registration ("farmer",
//! "veterinarian", ...). They are stored and echoed back, never used for
//! authorization.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

const USER_ROLE_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole(String);

impl UserRole {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let role = raw.into().trim().to_string();

        if role.is_empty() {
            return Err(AppError::bad_request("Role cannot be empty"));
        }
        if role.chars().count() > USER_ROLE_MAX_CHARS {
            return Err(AppError::bad_request(format!(
                "Role must be at most {USER_ROLE_MAX_CHARS} characters"
            )));
        }

        Ok(Self(role))
    }

    pub fn from_db(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
