use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::dsl::exists;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::wall::like::NewLike,
    dto::responses::{response_data::http_resp, social::toggle_like_response::ToggleLikeResponse},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{likes, posts},
    util::time::now::tokio_now,
};

/// Toggles the requesting user's like on a post. The composite primary
/// key on (user_id, post_id) is what keeps this at one like per user.
pub async fn toggle_like(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if !session.get_is_verified() {
        return Err(CodeError::USER_NOT_VERIFIED.into());
    }

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

    let removed = diesel::delete(
        likes::table
            .filter(likes::user_id.eq(user_id))
            .filter(likes::post_id.eq(post_id)),
    )
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    let liked = if removed == 0 {
        // Not liked yet; the conflict guard covers a racing double-tap.
        diesel::insert_into(likes::table)
            .values(NewLike::new(&user_id, &post_id))
            .on_conflict((likes::user_id, likes::post_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;
        true
    } else {
        false
    };

    let like_count: i64 = likes::table
        .filter(likes::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(ToggleLikeResponse { liked, like_count }, (), start))
}
