use serde_derive::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored object; reference it from posts or
    /// verification requests.
    pub url: String,
}
