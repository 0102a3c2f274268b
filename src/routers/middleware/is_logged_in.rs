use std::{str::FromStr, sync::Arc};

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{errors::code_error::HandlerResponse, init::state::ServerState};

#[derive(Clone)]
pub enum AuthStatus {
    LoggedIn(Uuid),
    LoggedOut,
}

/// Annotates every request with its login status without rejecting
/// anything; the hard gate is `auth_middleware`.
pub async fn is_logged_in_middleware(
    State(state): State<Arc<ServerState>>,
    cookie_jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let session_id = cookie_jar
        .get("session_id")
        .and_then(|session_cookie| Uuid::from_str(session_cookie.value()).ok());

    let auth_status = match session_id {
        Some(session_id) => match state.get_session(&session_id).await {
            Ok(session) if session.is_unexpired() => AuthStatus::LoggedIn(session.get_user_id()),
            _ => AuthStatus::LoggedOut,
        },
        None => AuthStatus::LoggedOut,
    };

    request.extensions_mut().insert(auth_status);

    let response = next.run(request).await;

    Ok(response)
}
