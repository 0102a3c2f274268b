use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::{post_images, posts};

#[derive(Serialize, Deserialize, Queryable, Selectable, Clone, ToSchema)]
#[diesel(table_name = posts)]
pub struct Post {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub post_content: String,
    pub post_is_anonymous: bool,
    pub post_is_announcement: bool,
    pub post_created_at: DateTime<Utc>,
    pub post_updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'np> {
    user_id: &'np Uuid,
    post_content: &'np str,
    post_is_anonymous: bool,
    post_is_announcement: bool,
}

impl<'np> NewPost<'np> {
    pub fn new(
        user_id: &'np Uuid,
        post_content: &'np str,
        post_is_anonymous: bool,
        post_is_announcement: bool,
    ) -> Self {
        Self {
            user_id,
            post_content,
            post_is_anonymous,
            post_is_announcement,
        }
    }
}

#[derive(Serialize, Deserialize, Queryable, Selectable, Clone, ToSchema)]
#[diesel(table_name = post_images)]
pub struct PostImage {
    pub post_image_id: Uuid,
    pub post_id: Uuid,
    pub post_image_url: String,
    pub post_image_order: i32,
}

#[derive(Insertable)]
#[diesel(table_name = post_images)]
pub struct NewPostImage<'ni> {
    post_id: &'ni Uuid,
    post_image_url: &'ni str,
    post_image_order: i32,
}

impl<'ni> NewPostImage<'ni> {
    pub fn new(post_id: &'ni Uuid, post_image_url: &'ni str, post_image_order: i32) -> Self {
        Self {
            post_id,
            post_image_url,
            post_image_order,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, ToSchema)]
pub struct PostAuthor {
    pub user_name: String,
    pub user_avatar_url: Option<String>,
}

/// Feed/detail shape: the owner's id stays present for client-side
/// ownership checks, but the author block is nulled out for anonymous
/// posts so the identity never leaves the server.
#[derive(Serialize, Deserialize, Clone, ToSchema)]
pub struct PostWithDetails {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub post_content: String,
    pub post_is_anonymous: bool,
    pub post_is_announcement: bool,
    pub post_created_at: DateTime<Utc>,
    pub post_updated_at: DateTime<Utc>,
    pub author: Option<PostAuthor>,
    pub image_urls: Vec<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub has_liked: bool,
}

impl PostWithDetails {
    pub fn assemble(
        post: Post,
        author: Option<PostAuthor>,
        image_urls: Vec<String>,
        like_count: i64,
        comment_count: i64,
        has_liked: bool,
    ) -> Self {
        let author = if post.post_is_anonymous { None } else { author };

        PostWithDetails {
            post_id: post.post_id,
            user_id: post.user_id,
            post_content: post.post_content,
            post_is_anonymous: post.post_is_anonymous,
            post_is_announcement: post.post_is_announcement,
            post_created_at: post.post_created_at,
            post_updated_at: post.post_updated_at,
            author,
            image_urls,
            like_count,
            comment_count,
            has_liked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(anonymous: bool) -> Post {
        Post {
            post_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            post_content: "hello wall".to_string(),
            post_is_anonymous: anonymous,
            post_is_announcement: false,
            post_created_at: Utc::now(),
            post_updated_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_posts_drop_the_author_block() {
        let post = sample_post(true);
        let author = Some(PostAuthor {
            user_name: "Zhang Wei".to_string(),
            user_avatar_url: Some("https://img.example/avatar.avif".to_string()),
        });

        let details = PostWithDetails::assemble(post.clone(), author, vec![], 3, 1, false);

        assert!(details.author.is_none());
        // Ownership checks still work client-side.
        assert_eq!(details.user_id, post.user_id);
    }

    #[test]
    fn named_posts_keep_the_author_block() {
        let post = sample_post(false);
        let author = Some(PostAuthor {
            user_name: "Zhang Wei".to_string(),
            user_avatar_url: None,
        });

        let details = PostWithDetails::assemble(post, author, vec![], 0, 0, true);

        assert_eq!(details.author.unwrap().user_name, "Zhang Wei");
        assert!(details.has_liked);
    }
}
