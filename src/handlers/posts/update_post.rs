use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::wall::post::Post,
    dto::{
        requests::posts::update_post_request::UpdatePostRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::posts,
    util::{string::validations::normalize_content, time::now::tokio_now},
};

/// Owner-only edit of content and anonymity. Admins moderate by
/// deletion, not by rewriting other people's posts.
pub async fn update_post(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let content = normalize_content(&request.content).ok_or_else(|| {
        code_err(CodeError::EMPTY_CONTENT, "Post content is empty after trimming")
    })?;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let owner_id: Uuid = posts::table
        .filter(posts::post_id.eq(post_id))
        .select(posts::user_id)
        .first(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .ok_or_else(|| CodeErrorResp::from(CodeError::POST_NOT_FOUND))?;

    if owner_id != session.get_user_id() {
        return Err(CodeError::NOT_CONTENT_OWNER.into());
    }

    let post: Post = diesel::update(posts::table.filter(posts::post_id.eq(post_id)))
        .set((
            posts::post_content.eq(content),
            posts::post_is_anonymous.eq(request.is_anonymous),
            posts::post_updated_at.eq(chrono::Utc::now()),
        ))
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    Ok(http_resp(post, (), start))
}
