use chrono::{DateTime, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schema::users;

#[derive(Serialize, Deserialize, Queryable, Selectable, Clone, ToSchema)]
#[diesel(table_name = users)]
pub struct User {
    pub user_id: uuid::Uuid,
    pub user_identity_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_avatar_url: Option<String>,
    pub user_role: String,
    pub user_is_verified: bool,
    pub user_created_at: DateTime<Utc>,
    pub user_updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct UserInsertable<'nu> {
    user_identity_id: &'nu str,
    user_name: &'nu str,
    user_email: &'nu str,
    user_avatar_url: Option<&'nu str>,
}

impl<'nu> UserInsertable<'nu> {
    pub fn new(
        user_identity_id: &'nu str,
        user_name: &'nu str,
        user_email: &'nu str,
        user_avatar_url: Option<&'nu str>,
    ) -> Self {
        Self {
            user_identity_id,
            user_name,
            user_email,
            user_avatar_url,
        }
    }
}

/// Profile fields the identity provider owns; applied on `user.updated`
/// webhooks and by the daily reconciliation job.
#[derive(AsChangeset)]
#[diesel(table_name = users)]
pub struct UserProfileChangeset<'uc> {
    pub user_name: &'uc str,
    pub user_avatar_url: Option<&'uc str>,
    pub user_updated_at: DateTime<Utc>,
}
