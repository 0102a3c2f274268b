use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use lettre::AsyncTransport;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    domain::verification::manual_verification::{ManualVerification, VerificationStatus},
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::manual_verifications,
    util::email::emails::VerificationDecisionEmail,
    util::time::now::tokio_now,
};

/// Rejection only flips the request status; the user's flags are left
/// alone and they may file again.
pub async fn reject_verification(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(manual_verification_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();
    let now = Utc::now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let verification: ManualVerification = manual_verifications::table
        .filter(manual_verifications::manual_verification_id.eq(manual_verification_id))
        .select(ManualVerification::as_select())
        .first(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .ok_or_else(|| CodeErrorResp::from(CodeError::VERIFICATION_NOT_FOUND))?;

    let updated = diesel::update(
        manual_verifications::table
            .filter(manual_verifications::manual_verification_id.eq(manual_verification_id))
            .filter(
                manual_verifications::manual_verification_status
                    .eq(VerificationStatus::Pending.as_str()),
            ),
    )
    .set((
        manual_verifications::manual_verification_status
            .eq(VerificationStatus::Rejected.as_str()),
        manual_verifications::manual_verification_decided_at.eq(now),
    ))
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    if updated == 0 {
        return Err(CodeError::VERIFICATION_ALREADY_DECIDED.into());
    }

    state.add_pending_verifications(-1);

    if let Some(requested_email) = verification.manual_verification_requested_email.as_deref() {
        match VerificationDecisionEmail::rejected()
            .set_decided_at(now)
            .to_message(state.get_email_from_address(), requested_email)
        {
            Ok(message) => {
                if let Err(e) = state.get_email_client().send(message).await {
                    error!(error = ?e, email = %requested_email, "Failed to send rejection email");
                }
            }
            Err(e) => {
                error!(error = ?e, email = %requested_email, "Could not build rejection email");
            }
        }
    }

    info!(
        manual_verification_id = %manual_verification_id,
        user_id = %verification.user_id,
        rejected_by = %session.get_user_id(),
        "Verification request rejected"
    );

    Ok(http_resp(
        serde_json::json!({ "status": VerificationStatus::Rejected }),
        (),
        start,
    ))
}
