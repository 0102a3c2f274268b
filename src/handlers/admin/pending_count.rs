use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};

use crate::{
    dto::responses::{
        admin::pending_count_response::PendingCountResponse, response_data::http_resp,
    },
    errors::code_error::HandlerResponse,
    init::state::ServerState,
    util::time::now::tokio_now,
};

/// Admin badge counter; served from the in-state atomic that the
/// minutely sync job and the inline adjustments keep fresh.
pub async fn pending_count(
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    Ok(http_resp(
        PendingCountResponse {
            pending_count: state.get_pending_verifications().max(0),
        },
        (),
        start,
    ))
}
