use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::dsl::exists;
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::wall::comment::{Comment, NewComment},
    dto::{
        requests::social::submit_comment_request::SubmitCommentRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{comments, posts},
    util::{string::validations::normalize_content, time::now::tokio_now},
};

#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments",
    tag = "social",
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = SubmitCommentRequest,
    responses(
        (status = 200, description = "Comment created", body = Comment),
        (status = 400, description = "Empty comment", body = CodeErrorResp),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 403, description = "Account not verified", body = CodeErrorResp),
        (status = 404, description = "Post not found", body = CodeErrorResp),
        (status = 500, description = "Internal server error", body = CodeErrorResp)
    )
)]
pub async fn submit_comment(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<SubmitCommentRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if !session.get_is_verified() {
        return Err(CodeError::USER_NOT_VERIFIED.into());
    }

    let content = normalize_content(&request.content).ok_or_else(|| {
        code_err(CodeError::EMPTY_CONTENT, "Comment is empty after trimming")
    })?;

    let user_id = session.get_user_id();

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

    let comment: Comment = diesel::insert_into(comments::table)
        .values(NewComment::new(&post_id, &user_id, content))
        .returning(Comment::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    drop(conn);

    Ok(http_resp(comment, (), start))
}
