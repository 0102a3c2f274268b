use serde_derive::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// "user" or "admin"; superadmin is never assignable.
    pub role: String,
}
