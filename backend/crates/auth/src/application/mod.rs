//! Application Layer
//!
//! Use cases and session token handling.

pub mod config;
pub mod get_profile;
pub mod login;
pub mod register;
pub mod session_token;

pub use get_profile::GetProfileUseCase;
pub use login::{LoginInput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
