use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable};
use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::likes;

// One like per (user, post); the composite primary key does the
// bookkeeping, the toggle handler just inserts or deletes.
#[derive(Serialize, Deserialize, Queryable, Clone)]
pub struct Like {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub like_created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike<'nl> {
    user_id: &'nl Uuid,
    post_id: &'nl Uuid,
}

impl<'nl> NewLike<'nl> {
    pub fn new(user_id: &'nl Uuid, post_id: &'nl Uuid) -> Self {
        Self { user_id, post_id }
    }
}
