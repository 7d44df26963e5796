//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository trait
//! - `application/` - Register / login / profile use cases, session tokens
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional application pepper
//! - Stateless HS256 session tokens carrying the user id and email
//! - Protected routes go through [`require_session`], which places a
//!   [`kernel::session::CurrentUser`] in the request extensions

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_token::{IssuedToken, SessionClaims, SessionTokens};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::middleware::{AuthMiddlewareState, require_session};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::session::CurrentUser;
