use std::{str::FromStr, sync::Arc};

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::dsl::exists;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::moderation::report::ReportStatus,
    dto::{
        requests::moderation::resolve_report_request::ResolveReportRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::reports,
    util::time::now::tokio_now,
};

/// pending -> {resolved, dismissed}; the status guard in the UPDATE is
/// what makes the transition one-way under concurrent admins.
pub async fn resolve_report(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Path(report_id): Path<Uuid>,
    Json(request): Json<ResolveReportRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let status = ReportStatus::from_str(&request.status)
        .map_err(|e| code_err(CodeError::INVALID_REPORT_STATUS, e))?;

    if !status.is_valid_resolution() {
        return Err(code_err(
            CodeError::INVALID_REPORT_STATUS,
            "A report can only move to resolved or dismissed",
        ));
    }

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let updated = diesel::update(
        reports::table
            .filter(reports::report_id.eq(report_id))
            .filter(reports::report_status.eq(ReportStatus::Pending.as_str())),
    )
    .set(reports::report_status.eq(status.as_str()))
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    if updated == 0 {
        let report_exists: bool =
            diesel::dsl::select(exists(reports::table.filter(reports::report_id.eq(report_id))))
                .get_result(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

        drop(conn);

        return Err(if report_exists {
            CodeError::REPORT_ALREADY_DECIDED.into()
        } else {
            CodeError::REPORT_NOT_FOUND.into()
        });
    }

    drop(conn);

    info!(
        report_id = %report_id,
        status = %status,
        decided_by = %session.get_user_id(),
        "Report decided"
    );

    Ok(http_resp(serde_json::json!({ "status": status }), (), start))
}
