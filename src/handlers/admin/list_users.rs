use std::{collections::HashMap, str::FromStr, sync::Arc};

use axum::{extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::auth::role::RoleType,
    dto::responses::{
        admin::users_response::{AdminUserEntry, AdminUsersResponse},
        response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::time::now::tokio_now,
};

const USER_LIST_LIMIT: usize = 100;

/// User management view: the identity provider is the source of truth
/// for the listing, merged with the local rows the webhooks maintain.
pub async fn list_users(
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let identity_users = state
        .identity()
        .list_users(USER_LIST_LIMIT)
        .await
        .map_err(|e| code_err(CodeError::IDENTITY_PROVIDER_ERROR, e))?;

    let identity_ids: Vec<&str> = identity_users.iter().map(|u| u.id.as_str()).collect();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let local_rows: Vec<(String, Uuid, bool)> = users::table
        .filter(users::user_identity_id.eq_any(&identity_ids))
        .select((users::user_identity_id, users::user_id, users::user_is_verified))
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    let local_map: HashMap<String, (Uuid, bool)> = local_rows
        .into_iter()
        .map(|(identity_id, user_id, is_verified)| (identity_id, (user_id, is_verified)))
        .collect();

    let entries: Vec<AdminUserEntry> = identity_users
        .into_iter()
        .map(|identity_user| {
            let local = local_map.get(&identity_user.id);

            let role = identity_user
                .public_metadata
                .role
                .as_deref()
                .and_then(|role| RoleType::from_str(role).ok())
                .unwrap_or(RoleType::User);

            let is_verified = identity_user
                .public_metadata
                .verified
                .or_else(|| local.map(|(_, verified)| *verified))
                .unwrap_or(false);

            AdminUserEntry {
                user_name: identity_user.display_name(),
                user_email: identity_user.primary_email().map(str::to_string),
                user_avatar_url: identity_user.image_url.clone(),
                role,
                is_verified,
                local_user_id: local.map(|(user_id, _)| *user_id),
                identity_user_id: identity_user.id,
            }
        })
        .collect();

    Ok(http_resp(AdminUsersResponse { users: entries }, (), start))
}
