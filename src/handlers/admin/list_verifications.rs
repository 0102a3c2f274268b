use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use crate::{
    domain::verification::manual_verification::{ManualVerification, VerificationStatus},
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    util::time::now::tokio_now,
};

/// Pending requests, oldest first, for the review queue.
pub async fn list_verifications(
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    use crate::schema::manual_verifications;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let pending: Vec<ManualVerification> = manual_verifications::table
        .filter(
            manual_verifications::manual_verification_status
                .eq(VerificationStatus::Pending.as_str()),
        )
        .order(manual_verifications::manual_verification_created_at.asc())
        .select(ManualVerification::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(pending, (), start))
}
