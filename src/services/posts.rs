use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        posts::{CreatePostDto, Post, PostChanges, UpdatePostDto},
        users::User,
    },
    policy::{ensure_owner, visible_posts},
    repositories::posts_repo::PostsRepository,
    Error, Result,
};

#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
}

// Ids that are not UUIDs cannot name an existing post.
fn parse_post_id(post_id: &str) -> Result<Uuid> {
    Uuid::parse_str(post_id).map_err(|_| Error::PostNotFound)
}

impl PostsService {
    pub fn new(repo: Arc<dyn PostsRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_post(&self, author: &User, new_post: CreatePostDto) -> Result<Post> {
        new_post.validate()?;

        let new_post = new_post.into_new_post(author.id);
        self.repo
            .create_post(new_post)
            .await?
            .ok_or(Error::PostCreation)
    }

    pub async fn update_post(
        &self,
        user: &User,
        post_id: &str,
        update_post: UpdatePostDto,
    ) -> Result<Post> {
        update_post.validate()?;

        let post_id = parse_post_id(post_id)?;
        let changes = update_post.into_changes();

        let original_post = self
            .repo
            .get_post_by_id(post_id)
            .await?
            .ok_or(Error::PostNotFound)?;

        ensure_owner(
            &original_post,
            user,
            "You cannot update a post that is not yours",
        )?;

        self.repo
            .update_post(post_id, changes)
            .await?
            .ok_or(Error::PostNotFound)
    }

    pub async fn get_posts(&self, viewer: Option<&User>) -> Result<Vec<Post>> {
        let all_posts = self.repo.get_all_posts().await?;
        Ok(visible_posts(all_posts, viewer))
    }

    /// Soft delete: the post stays stored with `active = false`.
    pub async fn delete_post(&self, user: &User, post_id: &str) -> Result<Post> {
        let post_id = parse_post_id(post_id)?;

        let post = self
            .repo
            .get_post_by_id(post_id)
            .await?
            .ok_or(Error::PostNotFound)?;

        ensure_owner(&post, user, "You cannot delete a post which is not yours")?;

        self.repo
            .update_post(post.id, PostChanges::deactivate())
            .await?
            .ok_or(Error::PostNotFound)
    }

    pub async fn get_posts_by_tag(&self, viewer: Option<&User>, tag_name: &str) -> Result<Vec<Post>> {
        let tagged_posts = self.repo.get_posts_by_tag_name(tag_name).await?;
        Ok(visible_posts(tagged_posts, viewer))
    }
}
