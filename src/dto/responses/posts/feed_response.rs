use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::domain::wall::post::PostWithDetails;

#[derive(Serialize, ToSchema)]
pub struct GetFeedResponse {
    pub posts: Vec<PostWithDetails>,
    pub page: usize,
    pub total_pages: usize,
}
