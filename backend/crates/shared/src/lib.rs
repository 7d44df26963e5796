//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest vocabulary every backend crate agrees on:
//! - Common error type and result alias
//! - Typed serial ids for the persisted entities
//! - The authenticated caller extracted from a verified session token
//! - Body and query extractors that reject with the common error type
//!
//! Only things whose meaning is identical across `auth` and `livestock`
//! belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
#[cfg(feature = "axum")]
pub mod session;
