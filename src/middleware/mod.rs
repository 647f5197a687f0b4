use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{models::users::User, AppState, Error, Result};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Attaches the token's user to the request when a token is present.
///
/// Requests without a token pass through anonymously; a malformed
/// `Authorization` header or an invalid token ends the request.
pub async fn auth(mut req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or(Error::InternalServerError)?;

    let token = match req.headers().get(header::AUTHORIZATION) {
        Some(auth_header) => {
            let auth_value = auth_header
                .to_str()
                .map_err(|_| Error::AuthorizationHeader)?;
            let token = auth_value
                .strip_prefix("Bearer ")
                .ok_or(Error::AuthorizationHeader)?;
            Some(token.to_string())
        }
        None => CookieJar::from_headers(req.headers())
            .get("token")
            .map(|c| c.value().to_string()),
    };

    if let Some(token) = token {
        let user_id = app_state.users_service.decode_token(token)?;

        match app_state.users_service.get_user(user_id).await? {
            Some(user) => {
                tracing::debug!(user_id = %user.id, "User set");
                req.extensions_mut().insert(AuthUser { user });
            }
            None => tracing::debug!(%user_id, "Token subject has no user"),
        }
    }

    Ok(next.run(req).await)
}

pub async fn log_posts_request(req: Request, next: Next) -> Response {
    tracing::info!(
        method = %req.method(),
        path = %req.uri().path(),
        "A request is being made to /api/posts"
    );

    next.run(req).await
}

/// Extractor for routes that need a logged-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .map(|auth| CurrentUser(auth.user.clone()))
            .ok_or(Error::MissingUser)
    }
}

/// Extractor for routes where a logged-in user only changes what is visible.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        Ok(MaybeUser(
            parts.extensions.get::<AuthUser>().map(|auth| auth.user.clone()),
        ))
    }
}
