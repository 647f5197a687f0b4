//! Ownership and visibility rules for authored resources.

use uuid::Uuid;

use crate::{
    models::{posts::Post, users::User},
    Error, Result,
};

/// A resource with exactly one owning user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;

    fn is_owned_by(&self, user: &User) -> bool {
        self.owner_id() == user.id
    }
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// Fails with `UnauthorizedUser(denial)` unless `user` owns `resource`.
pub fn ensure_owner<T: Owned>(resource: &T, user: &User, denial: &'static str) -> Result<()> {
    if resource.is_owned_by(user) {
        Ok(())
    } else {
        Err(Error::UnauthorizedUser(denial))
    }
}

/// Active posts are public; inactive ones are only visible to their author.
pub fn is_visible_to(post: &Post, viewer: Option<&User>) -> bool {
    post.active || viewer.is_some_and(|user| post.is_owned_by(user))
}

pub fn visible_posts(posts: Vec<Post>, viewer: Option<&User>) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| is_visible_to(post, viewer))
        .collect()
}
