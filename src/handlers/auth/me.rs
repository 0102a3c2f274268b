// An endpoint to get the user data if logged in.

use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use crate::{
    domain::user::User,
    dto::responses::{auth::me_response::MeResponse, response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::users,
    util::time::now::tokio_now,
};

pub async fn me_handler(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let user_info: User = users::table
        .filter(users::user_id.eq(session.get_user_id()))
        .select(User::as_select())
        .first(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::USER_NOT_FOUND, e))?;

    drop(conn);

    Ok(http_resp(
        MeResponse {
            user_info,
            session_role: session.get_role(),
            session_is_verified: session.get_is_verified(),
        },
        (),
        start,
    ))
}
