use std::sync::Arc;

use blog_posts_api::{
    config::Config,
    repositories::{MemoryRepo, PostgresRepo},
    routes::create_router,
    AppState,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blog_posts_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::init();

    let (app_state, pool) = match config.database_url.clone() {
        Some(database_url) => {
            let pool = connect(&config, &database_url).await;
            let db_blog = Arc::new(PostgresRepo::new(pool.clone()));
            let app_state = AppState::new(config.clone(), db_blog.clone(), db_blog);
            (app_state, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, posts are kept in memory");
            if config.seed_users.is_empty() {
                tracing::warn!("SEED_USERS is empty, every request will be anonymous");
            }
            for user in &config.seed_users {
                tracing::info!(user_id = %user.id, username = %user.username, "Seeded user");
            }
            let memory = Arc::new(MemoryRepo::with_users(config.seed_users.clone()));
            (AppState::new(config.clone(), memory.clone(), memory), None)
        }
    };

    let app = create_router(Arc::new(app_state));

    let bind_addr = format!("[::]:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("🔥 Failed to bind {bind_addr}: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!("The server is up on port: {}", config.port);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {err}");
    }

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }
}

async fn connect(config: &Config, database_url: &str) -> PgPool {
    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::error!("🔥 Failed to run migrations: {:?}", err);
            std::process::exit(1);
        }
        tracing::info!("Migrations applied");
    }

    pool
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!("Failed to listen for SIGTERM: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
