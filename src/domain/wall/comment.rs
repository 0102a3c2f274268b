use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::comments;

#[derive(Serialize, Deserialize, Queryable, Selectable, Clone, ToSchema)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment_content: String,
    pub comment_created_at: DateTime<Utc>,
    pub comment_updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment<'nc> {
    post_id: &'nc Uuid,
    user_id: &'nc Uuid,
    comment_content: &'nc str,
}

impl<'nc> NewComment<'nc> {
    pub fn new(post_id: &'nc Uuid, user_id: &'nc Uuid, comment_content: &'nc str) -> Self {
        Self {
            post_id,
            user_id,
            comment_content,
        }
    }
}

/// Comment joined with its author, ascending by creation time.
#[derive(Serialize, Deserialize, Queryable, Clone, ToSchema)]
pub struct CommentWithAuthor {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment_content: String,
    pub comment_created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_avatar_url: Option<String>,
}
