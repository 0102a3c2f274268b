use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct VerificationRequest {
    pub real_name: String,
    /// Four-digit class number, e.g. "2501".
    pub class_number: String,
    /// Campus email address the request is filed under.
    pub email: String,
    /// Blob-storage URL of the student-card photo.
    pub image_url: String,
}
