use std::str::FromStr;
use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::Cookie;
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::auth::role::RoleType,
    domain::user::User,
    dto::{
        requests::auth::session_request::SessionRequest,
        responses::response_data::http_resp_with_cookies,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::time::now::tokio_now,
};

/// Exchanges a provider-issued session token for a local session cookie.
/// The provider owns credentials; this only verifies the token, reads
/// the claims, and resolves the local user row the webhooks maintain.
pub async fn create_session(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SessionRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let session_info = state
        .identity()
        .verify_session_token(&request.session_token)
        .await
        .map_err(|e| code_err(CodeError::INVALID_SESSION_TOKEN, e))?;

    let identity_user = state
        .identity()
        .get_user(&session_info.user_id)
        .await
        .map_err(|e| code_err(CodeError::IDENTITY_PROVIDER_ERROR, e))?;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let user: User = match users::table
        .filter(users::user_identity_id.eq(&identity_user.id))
        .select(User::as_select())
        .first::<User>(&mut conn)
        .await
    {
        Ok(user) => user,
        Err(diesel::result::Error::NotFound) => {
            // The user.created webhook has not landed yet.
            return Err(CodeError::USER_NOT_FOUND.into());
        }
        Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
    };

    drop(conn);

    // Claims come from the provider's public metadata; the local row is
    // the fallback when metadata was never written.
    let role = identity_user
        .public_metadata
        .role
        .as_deref()
        .and_then(|role| RoleType::from_str(role).ok())
        .or_else(|| RoleType::from_str(&user.user_role).ok())
        .unwrap_or(RoleType::User);

    let is_verified = identity_user
        .public_metadata
        .verified
        .unwrap_or(user.user_is_verified);

    let session_id: Uuid = state
        .new_session(&user, role, is_verified, None)
        .await
        .map_err(|e| code_err(CodeError::SESSION_ID_ALREADY_EXISTS, e))?;

    let cookie = Cookie::build(("session_id", session_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(axum_extra::extract::cookie::SameSite::Strict)
        .build();

    Ok(http_resp_with_cookies(
        serde_json::json!({
            "message": "Session created",
            "user_id": user.user_id,
            "role": role,
            "is_verified": is_verified
        }),
        (),
        start,
        Some(vec![cookie]),
        None,
    ))
}
