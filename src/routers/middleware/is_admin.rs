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

/// Allows the request through only when the session role is admin or
/// superadmin.
///
/// Prerequisite: `auth_middleware` must have run earlier and inserted
/// the `Session` claims into request extensions.
pub async fn is_admin_middleware(
    request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let session = request
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(|| code_err(CodeError::UNAUTHORIZED_ACCESS, "Missing session claims"))?;

    if !session.get_role().is_admin() {
        return Err(CodeError::IS_NOT_ADMIN.into());
    }

    Ok(next.run(request).await)
}
