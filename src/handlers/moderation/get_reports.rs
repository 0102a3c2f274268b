use std::{collections::HashMap, str::FromStr, sync::Arc};

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use serde_derive::Deserialize;
use uuid::Uuid;

use crate::{
    domain::moderation::report::{Report, ReportStatus},
    dto::responses::{
        moderation::reports_response::{GetReportsResponse, ReportWithContext},
        response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{comments, posts, reports},
    util::time::now::tokio_now,
};

#[derive(Deserialize)]
pub struct GetReportsRequest {
    /// Defaults to "pending".
    pub status: Option<String>,
}

pub async fn get_reports(
    State(state): State<Arc<ServerState>>,
    Query(request): Query<GetReportsRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let status = match request.status.as_deref() {
        Some(raw) => ReportStatus::from_str(raw)
            .map_err(|e| code_err(CodeError::INVALID_REPORT_STATUS, e))?,
        None => ReportStatus::Pending,
    };

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let report_rows: Vec<Report> = reports::table
        .filter(reports::report_status.eq(status.as_str()))
        .order(reports::report_created_at.asc())
        .select(Report::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let post_ids: Vec<Uuid> = report_rows.iter().filter_map(|r| r.post_id).collect();
    let comment_ids: Vec<Uuid> = report_rows.iter().filter_map(|r| r.comment_id).collect();

    let post_contents: HashMap<Uuid, String> = posts::table
        .filter(posts::post_id.eq_any(&post_ids))
        .select((posts::post_id, posts::post_content))
        .load::<(Uuid, String)>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .into_iter()
        .collect();

    let comment_contents: HashMap<Uuid, String> = comments::table
        .filter(comments::comment_id.eq_any(&comment_ids))
        .select((comments::comment_id, comments::comment_content))
        .load::<(Uuid, String)>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .into_iter()
        .collect();

    drop(conn);

    let reports_with_context: Vec<ReportWithContext> = report_rows
        .into_iter()
        .map(|report| {
            let post_content = report
                .post_id
                .and_then(|id| post_contents.get(&id).cloned());
            let comment_content = report
                .comment_id
                .and_then(|id| comment_contents.get(&id).cloned());

            ReportWithContext {
                report,
                post_content,
                comment_content,
            }
        })
        .collect();

    Ok(http_resp(
        GetReportsResponse {
            reports: reports_with_context,
        },
        (),
        start,
    ))
}
