use serde_derive::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub like_count: i64,
}
