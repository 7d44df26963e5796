//! User Entity
//!
//! A farm owner account. Farms and livestock reference it by `UserId`.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::UserPassword, user_role::UserRole,
};

/// Validated registration data, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: Email,
    pub password: UserPassword,
    pub role: UserRole,
}

/// Persisted user row
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password: UserPassword,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
