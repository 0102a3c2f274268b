use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use diesel::ExpressionMethods;
use diesel_async::RunQueryDsl;
use tracing::{error, info};

use crate::{
    domain::verification::manual_verification::{NewManualVerification, compose_details},
    dto::{
        requests::verification::auto_verify_request::AutoVerifyRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{manual_verifications, users},
    util::identity::identity_client::MetadataPatch,
    util::{
        string::validations::{is_campus_email, validate_real_name},
        time::now::tokio_now,
    },
};

/// Automatic verification: one outbound roster call matching the
/// session's campus email against the submitted real name. A hit flips
/// the verified flag everywhere (provider metadata, local row, live
/// sessions) and leaves an approved audit row behind.
#[utoipa::path(
    post,
    path = "/api/verification/auto",
    tag = "verification",
    request_body = AutoVerifyRequest,
    responses(
        (status = 200, description = "Verified against the campus roster"),
        (status = 400, description = "Name missing or email not a campus address", body = crate::errors::code_error::CodeErrorResp),
        (status = 422, description = "Roster did not match", body = crate::errors::code_error::CodeErrorResp),
        (status = 502, description = "Roster or identity provider unavailable", body = crate::errors::code_error::CodeErrorResp)
    )
)]
pub async fn auto_verify(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Json(request): Json<AutoVerifyRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if !validate_real_name(&request.real_name) {
        return Err(CodeError::INVALID_REAL_NAME.into());
    }

    let email = session.get_user_email();
    if !is_campus_email(email, state.get_campus_email_domain()) {
        return Err(code_err(
            CodeError::EMAIL_NOT_CAMPUS,
            "Automatic verification requires a campus primary email",
        ));
    }

    let real_name = request.real_name.trim();

    let matched = state
        .roster()
        .matches(real_name, email)
        .await
        .map_err(|e| code_err(CodeError::ROSTER_PROVIDER_ERROR, e))?;

    if !matched {
        info!(user_id = %session.get_user_id(), "Roster match failed");
        return Err(CodeError::ROSTER_NO_MATCH.into());
    }

    // Provider metadata first: the session claims on the next login come
    // from there, so it must not lag the local flag.
    state
        .identity()
        .update_public_metadata(
            session.get_identity_user_id(),
            MetadataPatch {
                role: None,
                verified: Some(true),
            },
        )
        .await
        .map_err(|e| code_err(CodeError::IDENTITY_PROVIDER_ERROR, e))?;

    let user_id = session.get_user_id();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set((
            users::user_is_verified.eq(true),
            users::user_updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    let details = compose_details(real_name, None);

    // Audit trail only; a failure here must not undo the verification.
    if let Err(e) = diesel::insert_into(manual_verifications::table)
        .values(NewManualVerification::auto_approved(
            &user_id,
            session.get_identity_user_id(),
            &details,
            email,
        ))
        .execute(&mut conn)
        .await
    {
        error!(error = ?e, user_id = %user_id, "Failed to record auto-verification audit row");
    }

    drop(conn);

    state
        .refresh_sessions_for_user(user_id, None, Some(true))
        .await;

    info!(user_id = %user_id, "User verified via roster match");

    Ok(http_resp(
        serde_json::json!({ "message": "Verified", "is_verified": true }),
        (),
        start,
    ))
}
