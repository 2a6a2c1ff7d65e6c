use actix_web::{error, http::StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post {0} not found")]
    NotFound(String),

    #[error("Invalid post slug {0:?}")]
    InvalidSlug(String),

    #[error("Post title must not be empty")]
    EmptyTitle,
}

impl PostError {
    pub fn error_type(&self) -> &'static str {
        match self {
            PostError::NotFound(_) => "post_not_found",
            PostError::InvalidSlug(_) => "invalid_slug",
            PostError::EmptyTitle => "invalid_title",
        }
    }
}

impl error::ResponseError for PostError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostError::NotFound(_) => StatusCode::NOT_FOUND,
            PostError::InvalidSlug(_) => StatusCode::BAD_REQUEST,
            PostError::EmptyTitle => StatusCode::BAD_REQUEST,
        }
    }
}
