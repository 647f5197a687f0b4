//! In-process store used when no `DATABASE_URL` is configured, and by tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::{
        posts::{NewPost, Post, PostChanges},
        users::User,
    },
    Result,
};

use super::{posts_repo::PostsRepository, user_repo::UserRepository};

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    // insertion order doubles as creation order
    posts: Vec<Post>,
}

#[derive(Clone, Default)]
pub struct MemoryRepo {
    store: Arc<RwLock<Store>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Store {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
            posts: Vec::new(),
        };

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn insert_user(&self, user: User) {
        self.store.write().await.users.insert(user.id, user);
    }
}

#[async_trait]
impl PostsRepository for MemoryRepo {
    async fn get_all_posts(&self) -> Result<Vec<Post>> {
        Ok(self.store.read().await.posts.clone())
    }

    async fn get_post_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|post| post.id == post_id).cloned())
    }

    async fn get_posts_by_tag_name(&self, tag_name: &str) -> Result<Vec<Post>> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .filter(|post| post.tags.iter().any(|tag| tag == tag_name))
            .cloned()
            .collect())
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Option<Post>> {
        let post = Post {
            id: Uuid::now_v7(),
            title: new_post.title,
            content: new_post.content,
            author_id: new_post.author_id,
            active: true,
            tags: new_post.tags.unwrap_or_default(),
            created_at: Utc::now(),
        };

        self.store.write().await.posts.push(post.clone());
        Ok(Some(post))
    }

    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut store = self.store.write().await;
        let Some(post) = store.posts.iter_mut().find(|post| post.id == post_id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(tags) = changes.tags {
            post.tags = tags;
        }
        if let Some(active) = changes.active {
            post.active = active;
        }

        Ok(Some(post.clone()))
    }
}

#[async_trait]
impl UserRepository for MemoryRepo {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.store.read().await.users.get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(author_id: Uuid, tags: Option<&[&str]>) -> NewPost {
        NewPost {
            author_id,
            title: "T".to_string(),
            content: "C".to_string(),
            tags: tags.map(|tags| tags.iter().map(|tag| tag.to_string()).collect()),
        }
    }

    #[tokio::test]
    async fn created_posts_start_active_in_creation_order() {
        let repo = MemoryRepo::new();
        let author = Uuid::now_v7();

        let first = repo.create_post(new_post(author, None)).await.unwrap().unwrap();
        let second = repo
            .create_post(new_post(author, Some(&["x", "y"])))
            .await
            .unwrap()
            .unwrap();

        assert!(first.active);
        assert!(first.tags.is_empty());
        assert_eq!(second.tags, vec!["x", "y"]);

        let all = repo.get_all_posts().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn tag_lookup_matches_whole_names() {
        let repo = MemoryRepo::new();
        let author = Uuid::now_v7();
        repo.create_post(new_post(author, Some(&["rust"]))).await.unwrap();
        repo.create_post(new_post(author, Some(&["rusty"]))).await.unwrap();

        let tagged = repo.get_posts_by_tag_name("rust").await.unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].tags, vec!["rust"]);
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let repo = MemoryRepo::new();
        let post = repo
            .create_post(new_post(Uuid::now_v7(), Some(&["a"])))
            .await
            .unwrap()
            .unwrap();

        let updated = repo
            .update_post(
                post.id,
                PostChanges {
                    content: Some("C2".to_string()),
                    ..PostChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "T");
        assert_eq!(updated.content, "C2");
        assert_eq!(updated.tags, vec!["a"]);
        assert!(repo
            .update_post(Uuid::now_v7(), PostChanges::deactivate())
            .await
            .unwrap()
            .is_none());
    }
}
