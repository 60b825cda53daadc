use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections (bad content type, malformed or mistyped
/// body) surface as `AppError::Validation` in the JSON error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
