use serde_derive::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Exactly one of `post_id` / `comment_id` must be set.
#[derive(Deserialize, ToSchema)]
pub struct ReportRequest {
    #[serde(default)]
    pub post_id: Option<Uuid>,
    #[serde(default)]
    pub comment_id: Option<Uuid>,
    pub reason: String,
}
