use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SetVerifiedRequest {
    pub verified: bool,
}
