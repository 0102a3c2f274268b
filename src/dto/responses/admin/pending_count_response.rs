use serde_derive::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PendingCountResponse {
    pub pending_count: i64,
}
