use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SessionRequest {
    /// Session token minted by the identity provider's front-end SDK.
    pub session_token: String,
}
