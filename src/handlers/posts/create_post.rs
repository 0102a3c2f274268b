use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use diesel::SelectableHelper;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::{
    domain::wall::post::{NewPost, NewPostImage, Post},
    dto::{
        requests::posts::create_post_request::CreatePostRequest,
        responses::{
            posts::create_post_response::CreatePostResponse, response_data::http_resp,
        },
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{post_images, posts},
    util::{string::validations::{normalize_content, validate_image_url}, time::now::tokio_now},
};

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Empty content or bad image URL", body = CodeErrorResp),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 403, description = "Not verified, or announcement without admin role", body = CodeErrorResp),
        (status = 500, description = "Internal server error", body = CodeErrorResp)
    )
)]
pub async fn create_post(
    axum::Extension(session): axum::Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Json(request): Json<CreatePostRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if !session.get_is_verified() {
        return Err(CodeError::USER_NOT_VERIFIED.into());
    }

    let content = normalize_content(&request.content).ok_or_else(|| {
        code_err(CodeError::EMPTY_CONTENT, "Post content is empty after trimming")
    })?;

    if request.is_announcement && !session.get_role().is_admin() {
        return Err(CodeError::ANNOUNCEMENT_REQUIRES_ADMIN.into());
    }

    for url in &request.image_urls {
        if !validate_image_url(url) {
            return Err(code_err(
                CodeError::INVALID_IMAGE_URL,
                format!("Bad image URL: {url}"),
            ));
        }
    }

    let user_id = session.get_user_id();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    // Post row and its ordered images land together or not at all.
    let image_urls = &request.image_urls;
    let post: Post = conn
        .transaction::<Post, diesel::result::Error, _>(|conn| {
            async move {
                let post: Post = diesel::insert_into(posts::table)
                    .values(NewPost::new(
                        &user_id,
                        content,
                        request.is_anonymous,
                        request.is_announcement,
                    ))
                    .returning(Post::as_returning())
                    .get_result(conn)
                    .await?;

                if !image_urls.is_empty() {
                    let new_images: Vec<NewPostImage<'_>> = image_urls
                        .iter()
                        .enumerate()
                        .map(|(index, url)| {
                            NewPostImage::new(&post.post_id, url, (index + 1) as i32)
                        })
                        .collect();

                    diesel::insert_into(post_images::table)
                        .values(&new_images)
                        .execute(conn)
                        .await?;
                }

                Ok(post)
            }
            .scope_boxed()
        })
        .await
        .map_err(|e| -> CodeErrorResp { code_err(CodeError::DB_TRANSACTION_ERROR, e) })?;

    drop(conn);

    Ok(http_resp(
        CreatePostResponse {
            post_id: post.post_id,
            post_created_at: post.post_created_at,
        },
        (),
        start,
    ))
}
