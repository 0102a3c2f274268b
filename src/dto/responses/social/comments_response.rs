use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::domain::wall::comment::CommentWithAuthor;

#[derive(Serialize, ToSchema)]
pub struct GetCommentsResponse {
    pub comments: Vec<CommentWithAuthor>,
}
