use std::{str::FromStr, sync::Arc};

use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::responses::response_data::http_resp_with_cookies,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    util::time::now::tokio_now,
};

pub async fn logout(
    State(state): State<Arc<ServerState>>,
    cookie_jar: CookieJar,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let session_id = match cookie_jar.get("session_id") {
        Some(session_cookie) => Uuid::from_str(session_cookie.value())
            .map_err(|e| code_err(CodeError::UNAUTHORIZED_ACCESS, e))?,
        None => return Err(CodeError::UNAUTHORIZED_ACCESS.into()),
    };

    let (removed_session_id, remaining_sessions) = state
        .remove_session(session_id)
        .await
        .map_err(|e| code_err(CodeError::UNAUTHORIZED_ACCESS, e))?;

    info!(
        session_id = %removed_session_id,
        remaining_sessions,
        "Session removed on logout"
    );

    let expired_cookie = Cookie::build(("session_id", "")).path("/").build();

    Ok(http_resp_with_cookies(
        serde_json::json!({ "message": "Logged out" }),
        (),
        start,
        None,
        Some(vec![expired_cookie]),
    ))
}
