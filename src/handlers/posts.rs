use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;

use crate::{
    middleware::{log_posts_request, CurrentUser, MaybeUser},
    models::{
        posts::{CreatePostDto, UpdatePostDto},
        response::{PostResponse, PostsResponse},
    },
    AppState, Error, Result,
};

pub fn posts_handler() -> Router {
    Router::new()
        .route("/", get(get_posts).post(create_post))
        .route("/{post_id}", patch(update_post).delete(delete_post))
        .route("/tags/{tag_name}/posts", get(get_posts_by_tag))
        .layer(middleware::from_fn(log_posts_request))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(new_post), _): WithRejection<Json<CreatePostDto>, Error>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.create_post(&user, new_post).await?;

    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<String>,
    WithRejection(Json(update_post), _): WithRejection<Json<UpdatePostDto>, Error>,
) -> Result<impl IntoResponse> {
    let post = app_state
        .posts_service
        .update_post(&user, &post_id, update_post)
        .await?;

    Ok((StatusCode::OK, Json(PostResponse { post })))
}

async fn get_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
) -> Result<impl IntoResponse> {
    let posts = app_state.posts_service.get_posts(viewer.as_ref()).await?;

    Ok((StatusCode::OK, Json(PostsResponse { posts })))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.delete_post(&user, &post_id).await?;

    Ok((StatusCode::OK, Json(PostResponse { post })))
}

async fn get_posts_by_tag(
    Extension(app_state): Extension<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(tag_name): Path<String>,
) -> Result<impl IntoResponse> {
    let posts = app_state
        .posts_service
        .get_posts_by_tag(viewer.as_ref(), &tag_name)
        .await?;

    Ok((StatusCode::OK, Json(PostsResponse { posts })))
}
