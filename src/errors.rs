use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    MissingUser,
    AuthorizationHeader,
    InvalidToken,
    UnauthorizedUser(&'static str),
    PostNotFound,
    PostCreation,
    BadRequest(String),
    InternalServerError,
    DatabaseError(sqlx::Error),
}

impl Error {
    /// Name reported to clients in the `name` field of the error body.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingUser => "MissingUserError",
            Self::AuthorizationHeader => "AuthorizationHeaderError",
            Self::InvalidToken => "JsonWebTokenError",
            Self::UnauthorizedUser(_) => "UnauthorizedUserError",
            Self::PostNotFound => "PostNotFoundError",
            Self::PostCreation => "PostCreationError",
            Self::BadRequest(_) => "ValidationError",
            Self::InternalServerError => "InternalServerError",
            Self::DatabaseError(_) => "DatabaseError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingUser => "You must be logged in to perform this action".to_string(),
            Self::AuthorizationHeader => "Authorization token must start with Bearer".to_string(),
            Self::InvalidToken => "Invalid or expired token".to_string(),
            Self::UnauthorizedUser(msg) => msg.to_string(),
            Self::PostNotFound => "That post does not exist".to_string(),
            Self::PostCreation => "There was a problem creating the post".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::InternalServerError => "Internal server error".to_string(),
            Self::DatabaseError(err) => err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUser | Self::AuthorizationHeader | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::UnauthorizedUser(_) => StatusCode::FORBIDDEN,
            Self::PostNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PostCreation | Self::InternalServerError | Self::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name(), self.message())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(name = self.name(), "{}", self.message());
        }

        let body = Json(json!({ "name": self.name(), "message": self.message() }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        error!("Database error: {:?}", err);
        Self::DatabaseError(err)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
