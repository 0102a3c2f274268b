use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::auth::role::RoleType,
    dto::{
        requests::admin::update_role_request::UpdateRoleRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::users,
    util::identity::identity_client::MetadataPatch,
    util::time::now::tokio_now,
};

/// Superadmin-only role change. Provider metadata first (it is the
/// claims source of truth), then the local mirror, then live sessions.
pub async fn update_user_role(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(identity_user_id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let role = RoleType::from_str(&request.role)
        .map_err(|e| code_err(CodeError::INVALID_ROLE, e))?;

    if !role.is_assignable() {
        return Err(code_err(
            CodeError::INVALID_ROLE,
            "Superadmin cannot be assigned through the API",
        ));
    }

    state
        .identity()
        .update_public_metadata(
            &identity_user_id,
            MetadataPatch {
                role: Some(role.as_str().to_string()),
                verified: None,
            },
        )
        .await
        .map_err(|e| code_err(CodeError::IDENTITY_PROVIDER_ERROR, e))?;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    // The local row may be missing when the user.created webhook never
    // landed; the provider metadata is already correct in that case.
    let updated: Vec<Uuid> =
        diesel::update(users::table.filter(users::user_identity_id.eq(&identity_user_id)))
            .set((
                users::user_role.eq(role.as_str()),
                users::user_updated_at.eq(Utc::now()),
            ))
            .returning(users::user_id)
            .get_results(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    for user_id in &updated {
        state
            .refresh_sessions_for_user(*user_id, Some(role), None)
            .await;
    }

    info!(
        identity_user_id = %identity_user_id,
        role = %role,
        changed_by = %session.get_user_id(),
        "User role updated"
    );

    Ok(http_resp(
        serde_json::json!({ "identity_user_id": identity_user_id, "role": role }),
        (),
        start,
    ))
}
