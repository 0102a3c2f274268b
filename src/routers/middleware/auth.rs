use std::{str::FromStr, sync::Arc};

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
};

/// Resolves the session cookie against the session map and injects both
/// the user id and the full claims into request extensions. Handlers
/// behind this layer can `Extension(user_id)` / `Extension(session)`.
pub async fn auth_middleware(
    State(state): State<Arc<ServerState>>,
    cookie_jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let session_id = match cookie_jar.get("session_id") {
        Some(session_cookie) => match Uuid::from_str(session_cookie.value()) {
            Ok(session_id) => session_id,
            Err(e) => return Err(code_err(CodeError::UNAUTHORIZED_ACCESS, e)),
        },
        None => return Err(CodeError::UNAUTHORIZED_ACCESS.into()),
    };

    let session = match state.get_session(&session_id).await {
        Ok(session) => session,
        Err(e) => return Err(code_err(CodeError::UNAUTHORIZED_ACCESS, e)),
    };

    if !session.is_unexpired() {
        return Err(CodeError::UNAUTHORIZED_ACCESS.into());
    }

    request.extensions_mut().insert(session.get_user_id());
    request.extensions_mut().insert(session);

    let response = next.run(request).await;

    Ok(response)
}
