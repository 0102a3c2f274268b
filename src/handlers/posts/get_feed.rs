use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    Extension,
    extract::{Query, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, PgTextExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::wall::post::{Post, PostAuthor, PostWithDetails},
    dto::{
        requests::posts::get_feed_request::GetFeedRequest,
        responses::{posts::feed_response::GetFeedResponse, response_data::http_resp},
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{comments, likes, post_images, posts, users},
    util::time::now::tokio_now,
};

const DEFAULT_POSTS_PER_PAGE: usize = 50;
const MAX_POSTS_PER_PAGE: usize = 100;

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(GetFeedRequest),
    responses(
        (status = 200, description = "Feed page, announcements pinned first", body = GetFeedResponse),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 500, description = "Internal server error", body = CodeErrorResp)
    )
)]
pub async fn get_feed(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Query(request): Query<GetFeedRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page = request.page.unwrap_or(1).max(1);
    let posts_per_page = request
        .posts_per_page
        .unwrap_or(DEFAULT_POSTS_PER_PAGE)
        .clamp(1, MAX_POSTS_PER_PAGE);
    let search = request
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let mut count_query = posts::table.into_boxed();
    let mut page_query = posts::table.into_boxed();
    if let Some(q) = search {
        let pattern = format!("%{q}%");
        count_query = count_query.filter(posts::post_content.ilike(pattern.clone()));
        page_query = page_query.filter(posts::post_content.ilike(pattern));
    }

    let total_posts: i64 = count_query
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    // Announcements pin ahead of the chronological feed.
    let page_posts: Vec<Post> = page_query
        .order((
            posts::post_is_announcement.desc(),
            posts::post_created_at.desc(),
        ))
        .offset(((page - 1) * posts_per_page) as i64)
        .limit(posts_per_page as i64)
        .select(Post::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let post_ids: Vec<Uuid> = page_posts.iter().map(|post| post.post_id).collect();

    let mut author_ids: Vec<Uuid> = page_posts.iter().map(|post| post.user_id).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: Vec<(Uuid, String, Option<String>)> = users::table
        .filter(users::user_id.eq_any(&author_ids))
        .select((users::user_id, users::user_name, users::user_avatar_url))
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let author_map: HashMap<Uuid, PostAuthor> = authors
        .into_iter()
        .map(|(user_id, user_name, user_avatar_url)| {
            (
                user_id,
                PostAuthor {
                    user_name,
                    user_avatar_url,
                },
            )
        })
        .collect();

    let image_rows: Vec<(Uuid, String)> = post_images::table
        .filter(post_images::post_id.eq_any(&post_ids))
        .order((post_images::post_id, post_images::post_image_order))
        .select((post_images::post_id, post_images::post_image_url))
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let mut image_map: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (post_id, url) in image_rows {
        image_map.entry(post_id).or_default().push(url);
    }

    let like_counts: Vec<(Uuid, i64)> = likes::table
        .filter(likes::post_id.eq_any(&post_ids))
        .group_by(likes::post_id)
        .select((likes::post_id, diesel::dsl::count_star()))
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
    let like_count_map: HashMap<Uuid, i64> = like_counts.into_iter().collect();

    let comment_counts: Vec<(Uuid, i64)> = comments::table
        .filter(comments::post_id.eq_any(&post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, diesel::dsl::count_star()))
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
    let comment_count_map: HashMap<Uuid, i64> = comment_counts.into_iter().collect();

    let my_likes: Vec<Uuid> = likes::table
        .filter(likes::post_id.eq_any(&post_ids))
        .filter(likes::user_id.eq(session.get_user_id()))
        .select(likes::post_id)
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;
    let my_like_set: HashSet<Uuid> = my_likes.into_iter().collect();

    drop(conn);

    let posts_with_details: Vec<PostWithDetails> = page_posts
        .into_iter()
        .map(|post| {
            let author = author_map.get(&post.user_id).cloned();
            let image_urls = image_map.remove(&post.post_id).unwrap_or_default();
            let like_count = like_count_map.get(&post.post_id).copied().unwrap_or(0);
            let comment_count = comment_count_map.get(&post.post_id).copied().unwrap_or(0);
            let has_liked = my_like_set.contains(&post.post_id);

            PostWithDetails::assemble(post, author, image_urls, like_count, comment_count, has_liked)
        })
        .collect();

    let total_pages = (total_posts as usize).div_ceil(posts_per_page);

    Ok(http_resp(
        GetFeedResponse {
            posts: posts_with_details,
            page,
            total_pages,
        },
        (),
        start,
    ))
}
