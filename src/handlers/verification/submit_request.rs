use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use diesel::dsl::exists;
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use tracing::info;

use crate::{
    domain::verification::manual_verification::{
        ManualVerification, NewManualVerification, VerificationStatus, compose_details,
    },
    dto::{
        requests::verification::verification_request::VerificationRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::manual_verifications,
    util::{
        string::validations::{
            is_campus_email, validate_class_number, validate_image_url, validate_real_name,
        },
        time::now::tokio_now,
    },
};

#[utoipa::path(
    post,
    path = "/api/verification/requests",
    tag = "verification",
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Request filed for review", body = ManualVerification),
        (status = 400, description = "Validation failed", body = CodeErrorResp),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 409, description = "A request is already pending", body = CodeErrorResp),
        (status = 500, description = "Internal server error", body = CodeErrorResp)
    )
)]
pub async fn submit_verification_request(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Json(request): Json<VerificationRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if !validate_real_name(&request.real_name) {
        return Err(CodeError::INVALID_REAL_NAME.into());
    }

    if !validate_class_number(&request.class_number) {
        return Err(code_err(
            CodeError::INVALID_CLASS_NUMBER,
            format!("Got '{}'", request.class_number),
        ));
    }

    if !is_campus_email(&request.email, state.get_campus_email_domain()) {
        return Err(code_err(
            CodeError::EMAIL_NOT_CAMPUS,
            format!(
                "Verification email must end in @{}",
                state.get_campus_email_domain()
            ),
        ));
    }

    if !validate_image_url(&request.image_url) {
        return Err(CodeError::INVALID_IMAGE_URL.into());
    }

    let user_id = session.get_user_id();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let already_pending: bool = diesel::dsl::select(exists(
        manual_verifications::table
            .filter(manual_verifications::user_id.eq(user_id))
            .filter(
                manual_verifications::manual_verification_status
                    .eq(VerificationStatus::Pending.as_str()),
            ),
    ))
    .get_result(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if already_pending {
        return Err(CodeError::VERIFICATION_ALREADY_PENDING.into());
    }

    let details = compose_details(request.real_name.trim(), Some(request.class_number.as_str()));

    let verification: ManualVerification = diesel::insert_into(manual_verifications::table)
        .values(NewManualVerification::pending(
            &user_id,
            session.get_identity_user_id(),
            &details,
            &request.image_url,
            &request.email,
        ))
        .returning(ManualVerification::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    drop(conn);

    state.add_pending_verifications(1);

    info!(
        user_id = %user_id,
        manual_verification_id = %verification.manual_verification_id,
        "Manual verification request filed"
    );

    Ok(http_resp(verification, (), start))
}
