use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ResolveReportRequest {
    /// "resolved" or "dismissed".
    pub status: String,
}
