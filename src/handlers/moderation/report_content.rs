use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use diesel::dsl::exists;
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use crate::{
    domain::moderation::report::{NewReport, Report},
    dto::{
        requests::moderation::report_request::ReportRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::{ServerState, Session},
    schema::{comments, posts, reports},
    util::{string::validations::normalize_content, time::now::tokio_now},
};

#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "moderation",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Report filed", body = Report),
        (status = 400, description = "Bad target or empty reason", body = CodeErrorResp),
        (status = 401, description = "Not logged in", body = CodeErrorResp),
        (status = 404, description = "Target not found", body = CodeErrorResp),
        (status = 500, description = "Internal server error", body = CodeErrorResp)
    )
)]
pub async fn report_content(
    Extension(session): Extension<Session>,
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ReportRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let reason = normalize_content(&request.reason).ok_or_else(|| {
        code_err(CodeError::EMPTY_CONTENT, "Report reason is empty after trimming")
    })?;

    let reporter_id = session.get_user_id();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let report: Report = match (request.post_id, request.comment_id) {
        (Some(post_id), None) => {
            diesel::dsl::select(exists(posts::table.filter(posts::post_id.eq(post_id))))
                .get_result::<bool>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
                .then_some(())
                .ok_or(CodeError::POST_NOT_FOUND)?;

            diesel::insert_into(reports::table)
                .values(NewReport::for_post(&reporter_id, &post_id, reason))
                .returning(Report::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?
        }
        (None, Some(comment_id)) => {
            diesel::dsl::select(exists(
                comments::table.filter(comments::comment_id.eq(comment_id)),
            ))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
            .then_some(())
            .ok_or(CodeError::COMMENT_NOT_FOUND)?;

            diesel::insert_into(reports::table)
                .values(NewReport::for_comment(&reporter_id, &comment_id, reason))
                .returning(Report::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?
        }
        _ => return Err(CodeError::INVALID_REPORT_TARGET.into()),
    };

    drop(conn);

    Ok(http_resp(report, (), start))
}
