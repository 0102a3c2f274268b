use axum::http::Uri;
use axum::response::IntoResponse;

use crate::errors::code_error::{CodeError, code_err};

pub async fn fallback_handler(uri: Uri) -> impl IntoResponse {
    code_err(CodeError::ROUTE_NOT_FOUND, format!("No route for {uri}"))
}
