//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Bearer token extraction from request headers
//! - Shared-access-signature tokens for sensor devices

pub mod bearer;
pub mod crypto;
pub mod password;
pub mod sas;
