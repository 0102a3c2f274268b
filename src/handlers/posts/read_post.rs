use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::wall::post::{Post, PostAuthor, PostWithDetails},
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{comments, likes, post_images, posts, users},
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    tag = "posts",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post detail", body = PostWithDetails),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 404, description = "Post not found", body = CodeErrorResp),
        (status = 500, description = "Internal server error", body = CodeErrorResp)
    )
)]
pub async fn read_post(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let post: Post = posts::table
        .filter(posts::post_id.eq(post_id))
        .select(Post::as_select())
        .first(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .ok_or_else(|| CodeErrorResp::from(CodeError::POST_NOT_FOUND))?;

    let author: Option<PostAuthor> = users::table
        .filter(users::user_id.eq(post.user_id))
        .select((users::user_name, users::user_avatar_url))
        .first::<(String, Option<String>)>(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .map(|(user_name, user_avatar_url)| PostAuthor {
            user_name,
            user_avatar_url,
        });

    let image_urls: Vec<String> = post_images::table
        .filter(post_images::post_id.eq(post_id))
        .order(post_images::post_image_order)
        .select(post_images::post_image_url)
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let like_count: i64 = likes::table
        .filter(likes::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let comment_count: i64 = comments::table
        .filter(comments::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let has_liked: i64 = likes::table
        .filter(likes::post_id.eq(post_id))
        .filter(likes::user_id.eq(session.get_user_id()))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(
        PostWithDetails::assemble(
            post,
            author,
            image_urls,
            like_count,
            comment_count,
            has_liked > 0,
        ),
        (),
        start,
    ))
}
