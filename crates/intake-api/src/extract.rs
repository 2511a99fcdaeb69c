use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections render as the JSON [`ApiError`] body
/// instead of axum's plain-text reply.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
