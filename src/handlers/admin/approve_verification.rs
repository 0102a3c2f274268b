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
    schema::{manual_verifications, users},
    util::email::emails::VerificationDecisionEmail,
    util::identity::identity_client::MetadataPatch,
    util::time::now::tokio_now,
};

#[utoipa::path(
    post,
    path = "/api/admin/verifications/{manual_verification_id}/approve",
    tag = "admin",
    params(("manual_verification_id" = Uuid, Path, description = "Verification request id")),
    responses(
        (status = 200, description = "Request approved, user verified"),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 403, description = "Not an admin", body = CodeErrorResp),
        (status = 404, description = "Request not found", body = CodeErrorResp),
        (status = 409, description = "Request already decided", body = CodeErrorResp),
        (status = 502, description = "Identity provider unavailable", body = CodeErrorResp)
    )
)]
pub async fn approve_verification(
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

    // Status guard makes pending -> approved one-way even with two
    // admins racing on the same request.
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
            .eq(VerificationStatus::Approved.as_str()),
        manual_verifications::manual_verification_decided_at.eq(now),
    ))
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    if updated == 0 {
        return Err(CodeError::VERIFICATION_ALREADY_DECIDED.into());
    }

    // Provider metadata is the claims source of truth; patch it before
    // touching the local mirror.
    state
        .identity()
        .update_public_metadata(
            &verification.identity_user_id,
            MetadataPatch {
                role: None,
                verified: Some(true),
            },
        )
        .await
        .map_err(|e| code_err(CodeError::IDENTITY_PROVIDER_ERROR, e))?;

    diesel::update(users::table.filter(users::user_id.eq(verification.user_id)))
        .set((
            users::user_is_verified.eq(true),
            users::user_updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    state.add_pending_verifications(-1);
    state
        .refresh_sessions_for_user(verification.user_id, None, Some(true))
        .await;

    // Decision mail is best-effort; the approval already happened.
    if let Some(requested_email) = verification.manual_verification_requested_email.as_deref() {
        match VerificationDecisionEmail::approved()
            .set_decided_at(now)
            .to_message(state.get_email_from_address(), requested_email)
        {
            Ok(message) => {
                if let Err(e) = state.get_email_client().send(message).await {
                    error!(error = ?e, email = %requested_email, "Failed to send approval email");
                }
            }
            Err(e) => {
                error!(error = ?e, email = %requested_email, "Could not build approval email");
            }
        }
    }

    info!(
        manual_verification_id = %manual_verification_id,
        user_id = %verification.user_id,
        approved_by = %session.get_user_id(),
        "Verification request approved"
    );

    Ok(http_resp(
        serde_json::json!({ "status": VerificationStatus::Approved }),
        (),
        start,
    ))
}
