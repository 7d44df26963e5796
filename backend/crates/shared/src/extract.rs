//! Request extractors whose rejections render as [`AppError`].
//!
//! axum's own `Json` and `Query` reject with a plain-text body. These wrap
//! them so a malformed body or query string gets the usual JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::app_error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
