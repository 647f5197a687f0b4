use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware, Extension, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, handlers::posts::posts_handler, middleware::auth, AppState};

pub fn configure_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match config.cors_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(err)) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN: {err}");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/posts", posts_handler())
        .layer(middleware::from_fn(auth))
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors(&app_state.config))
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}
