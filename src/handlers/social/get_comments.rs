use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::dsl::exists;
use diesel::{ExpressionMethods, JoinOnDsl, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::wall::comment::CommentWithAuthor,
    dto::responses::{response_data::http_resp, social::comments_response::GetCommentsResponse},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{comments, posts, users},
    util::time::now::tokio_now,
};

pub async fn get_comments(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    diesel::dsl::select(exists(posts::table.filter(posts::post_id.eq(post_id))))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .then_some(())
        .ok_or(CodeError::POST_NOT_FOUND)?;

    let rows: Vec<CommentWithAuthor> = comments::table
        .inner_join(users::table.on(users::user_id.eq(comments::user_id)))
        .filter(comments::post_id.eq(post_id))
        .order(comments::comment_created_at.asc())
        .select((
            comments::comment_id,
            comments::post_id,
            comments::user_id,
            comments::comment_content,
            comments::comment_created_at,
            users::user_name,
            users::user_avatar_url,
        ))
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(GetCommentsResponse { comments: rows }, (), start))
}
