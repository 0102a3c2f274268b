use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::IntoResponse,
};

use crate::{
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::Session,
};

/// The user-management surface is superadmin-only, mirroring the
/// stricter route gate of the original admin area.
pub async fn is_superadmin_middleware(
    request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let session = request
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(|| code_err(CodeError::UNAUTHORIZED_ACCESS, "Missing session claims"))?;

    if !session.get_role().is_superadmin() {
        return Err(CodeError::IS_NOT_SUPERADMIN.into());
    }

    Ok(next.run(request).await)
}
