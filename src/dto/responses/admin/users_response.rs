use serde_derive::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::role::RoleType;

/// Provider-side profile merged with the local row (when the webhook
/// has landed).
#[derive(Serialize, ToSchema)]
pub struct AdminUserEntry {
    pub identity_user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_avatar_url: Option<String>,
    pub role: RoleType,
    pub is_verified: bool,
    pub local_user_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct AdminUsersResponse {
    pub users: Vec<AdminUserEntry>,
}
