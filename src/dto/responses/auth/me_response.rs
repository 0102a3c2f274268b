use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::domain::auth::role::RoleType;
use crate::domain::user::User;

#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user_info: User,
    pub session_role: RoleType,
    pub session_is_verified: bool,
}
