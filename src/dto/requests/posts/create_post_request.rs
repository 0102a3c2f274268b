use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    /// Blob-storage URLs returned by the upload endpoint, in display order.
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_announcement: bool,
}
