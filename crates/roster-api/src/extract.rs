//! `Json` and `Path` extractors whose rejections render as [`ApiError`], so a
//! malformed body or id gets the same `{"error", "message"}` shape as every
//! other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::ApiError;

/// A JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);
