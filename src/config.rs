use dotenv::dotenv;
use uuid::Uuid;

use crate::models::users::User;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the API on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub port: u16,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub cors_origin: Option<String>,
    /// Users preloaded into the in-memory store, from `SEED_USERS`.
    pub seed_users: Vec<User>,
}

/// Parses `id:username` pairs separated by commas.
fn parse_seed_users(raw: &str) -> Vec<User> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, username) = entry
                .split_once(':')
                .map(|(id, username)| (id.trim(), username.trim()))
                .filter(|(_, username)| !username.is_empty())
                .unwrap_or_else(|| panic!("SEED_USERS entries must be id:username, got {entry:?}"));
            let id = Uuid::parse_str(id)
                .unwrap_or_else(|_| panic!("SEED_USERS id must be a UUID, got {id:?}"));

            User {
                id,
                username: username.to_string(),
                name: username.to_string(),
                location: String::new(),
                active: true,
            }
        })
        .collect()
}

impl Config {
    pub fn init() -> Config {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").unwrap_or_else(|| {
            panic!("🔒 JWT_SECRET environment variable must be set and non-empty!");
        });

        let port = non_empty("PORT")
            .map(|port| {
                port.parse::<u16>()
                    .unwrap_or_else(|_| panic!("PORT must be a valid port number, got {port:?}"))
            })
            .unwrap_or(3000);

        let max_connections = non_empty("DATABASE_MAX_CONNECTIONS")
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(10);

        let run_migrations = non_empty("RUN_MIGRATIONS")
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Config {
            database_url: non_empty("DATABASE_URL"),
            jwt_secret,
            port,
            max_connections,
            run_migrations,
            cors_origin: non_empty("CORS_ORIGIN"),
            seed_users: non_empty("SEED_USERS")
                .map(|raw| parse_seed_users(&raw))
                .unwrap_or_default(),
        }
    }
}
