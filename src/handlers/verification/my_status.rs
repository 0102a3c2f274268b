use std::{str::FromStr, sync::Arc};

use axum::{Extension, extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;

use crate::{
    domain::verification::manual_verification::VerificationStatus,
    dto::responses::{
        response_data::http_resp,
        verification::verification_status_response::VerificationStatusResponse,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::manual_verifications,
    util::time::now::tokio_now,
};

/// Latest verification request status for the requesting user, or null
/// if they never filed one.
pub async fn my_verification_status(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let latest_status: Option<String> = manual_verifications::table
        .filter(manual_verifications::user_id.eq(session.get_user_id()))
        .order(manual_verifications::manual_verification_created_at.desc())
        .select(manual_verifications::manual_verification_status)
        .first::<String>(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    let status = latest_status
        .as_deref()
        .map(VerificationStatus::from_str)
        .transpose()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    Ok(http_resp(VerificationStatusResponse { status }, (), start))
}
