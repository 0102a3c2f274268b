use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}
