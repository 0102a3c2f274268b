use serde_derive::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
pub struct GetFeedRequest {
    /// 1-based page number.
    pub page: Option<usize>,
    pub posts_per_page: Option<usize>,
    /// Substring filter over post content.
    pub q: Option<String>,
}
