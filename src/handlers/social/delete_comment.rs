use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::comments,
    util::time::now::tokio_now,
};

pub async fn delete_comment(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(comment_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let owner_id: Uuid = comments::table
        .filter(comments::comment_id.eq(comment_id))
        .select(comments::user_id)
        .first(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .ok_or_else(|| CodeErrorResp::from(CodeError::COMMENT_NOT_FOUND))?;

    let is_owner = owner_id == session.get_user_id();
    if !is_owner && !session.get_role().is_admin() {
        return Err(CodeError::NOT_CONTENT_OWNER.into());
    }

    diesel::delete(comments::table.filter(comments::comment_id.eq(comment_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    drop(conn);

    info!(
        comment_id = %comment_id,
        deleted_by = %session.get_user_id(),
        as_moderator = !is_owner,
        "Comment deleted"
    );

    Ok(http_resp((), (), start))
}
