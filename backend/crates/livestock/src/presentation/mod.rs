//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::LivestockAppState;
pub use router::{livestock_router, livestock_router_generic};
