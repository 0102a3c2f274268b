use chrono::{DateTime, Utc};
use serde_derive::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct CreatePostResponse {
    pub post_id: Uuid,
    pub post_created_at: DateTime<Utc>,
}
