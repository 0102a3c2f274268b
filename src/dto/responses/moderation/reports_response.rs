use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::domain::moderation::report::Report;

/// Report row plus a snippet of what it points at, so the moderation
/// queue renders without extra round-trips.
#[derive(Serialize, ToSchema)]
pub struct ReportWithContext {
    #[serde(flatten)]
    pub report: Report,
    pub post_content: Option<String>,
    pub comment_content: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GetReportsResponse {
    pub reports: Vec<ReportWithContext>,
}
