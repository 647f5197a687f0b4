use serde::{Deserialize, Serialize};

use super::posts::Post;

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: Post,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}
