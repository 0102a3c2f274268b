use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AutoVerifyRequest {
    /// Real name to match against the campus roster; the email comes
    /// from the session claims.
    pub real_name: String,
}
