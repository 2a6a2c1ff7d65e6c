use actix_web::{error, http::StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Project {0} not found")]
    NotFound(String),

    #[error("Invalid project slug {0:?}")]
    InvalidSlug(String),

    #[error("Project title must not be empty")]
    EmptyTitle,

    #[error("Invalid project link {0:?}")]
    InvalidUrl(String),
}

impl ProjectError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ProjectError::NotFound(_) => "project_not_found",
            ProjectError::InvalidSlug(_) => "invalid_slug",
            ProjectError::EmptyTitle => "invalid_title",
            ProjectError::InvalidUrl(_) => "invalid_url",
        }
    }
}

impl error::ResponseError for ProjectError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProjectError::NotFound(_) => StatusCode::NOT_FOUND,
            ProjectError::InvalidSlug(_) => StatusCode::BAD_REQUEST,
            ProjectError::EmptyTitle => StatusCode::BAD_REQUEST,
            ProjectError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        }
    }
}
