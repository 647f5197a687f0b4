use std::sync::Arc;

use config::Config;
use repositories::{posts_repo::PostsRepository, user_repo::UserRepository};
use services::{posts::PostsService, user::UserService};

pub use self::errors::{Error, Result};

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod repositories;
pub mod routes;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub posts_service: PostsService,
    pub users_service: UserService,
}

impl AppState {
    pub fn new(
        config: Config,
        posts_repo: Arc<dyn PostsRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        let users_service = UserService::new(user_repo, config.jwt_secret.clone());

        Self {
            config,
            posts_service: PostsService::new(posts_repo),
            users_service,
        }
    }
}
