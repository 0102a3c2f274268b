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
    dto::{
        requests::admin::set_verified_request::SetVerifiedRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::users,
    util::identity::identity_client::MetadataPatch,
    util::time::now::tokio_now,
};

/// Superadmin toggle for the verified flag, outside the request queue.
/// Same three-way write as a verification decision: provider metadata,
/// local row, live sessions.
pub async fn set_user_verified(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(identity_user_id): Path<String>,
    Json(request): Json<SetVerifiedRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    state
        .identity()
        .update_public_metadata(
            &identity_user_id,
            MetadataPatch {
                role: None,
                verified: Some(request.verified),
            },
        )
        .await
        .map_err(|e| code_err(CodeError::IDENTITY_PROVIDER_ERROR, e))?;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let updated: Vec<Uuid> =
        diesel::update(users::table.filter(users::user_identity_id.eq(&identity_user_id)))
            .set((
                users::user_is_verified.eq(request.verified),
                users::user_updated_at.eq(Utc::now()),
            ))
            .returning(users::user_id)
            .get_results(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    for user_id in &updated {
        state
            .refresh_sessions_for_user(*user_id, None, Some(request.verified))
            .await;
    }

    info!(
        identity_user_id = %identity_user_id,
        verified = request.verified,
        changed_by = %session.get_user_id(),
        "User verified flag updated"
    );

    Ok(http_resp(
        serde_json::json!({ "identity_user_id": identity_user_id, "verified": request.verified }),
        (),
        start,
    ))
}
