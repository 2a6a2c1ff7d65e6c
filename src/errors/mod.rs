pub mod config;
pub mod post;
pub mod project;

use actix_web::{
    HttpResponse,
    body::BoxBody,
    error::{self, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
};

use crate::database::DatabaseError;
use crate::models::responses::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("Resource not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Post(#[from] post::PostError),

    #[error(transparent)]
    Project(#[from] project::ProjectError),

    #[error(transparent)]
    JsonPayload(#[from] JsonPayloadError),

    #[error(transparent)]
    QueryPayload(#[from] QueryPayloadError),
}

impl From<DatabaseError> for FolioError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::Sqlx(e) => FolioError::Database(e),
            DatabaseError::Post(e) => FolioError::Post(e),
            DatabaseError::Project(e) => FolioError::Project(e),
        }
    }
}

impl FolioError {
    fn is_conflict(&self) -> bool {
        match self {
            FolioError::Database(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            FolioError::NotFound => "resource_not_found_error",
            FolioError::Database(..) if self.is_conflict() => "conflict_error",
            FolioError::Database(..) => "database_error",
            FolioError::Post(e) => e.error_type(),
            FolioError::Project(e) => e.error_type(),
            FolioError::JsonPayload(..) | FolioError::QueryPayload(..) => "invalid_request_error",
        }
    }
}

impl error::ResponseError for FolioError {
    fn status_code(&self) -> StatusCode {
        match self {
            FolioError::NotFound => StatusCode::NOT_FOUND,
            FolioError::Database(..) if self.is_conflict() => StatusCode::CONFLICT,
            FolioError::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Post(e) => e.status_code(),
            FolioError::Project(e) => e.status_code(),
            FolioError::JsonPayload(..) | FolioError::QueryPayload(..) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        // Driver errors can leak schema details.
        let message = match self {
            FolioError::Database(..) if !self.is_conflict() => "A database error occurred".to_owned(),
            _ => self.to_string(),
        };

        let response = ErrorResponse {
            ok: false,
            error: self.error_type(),
            message,
        };

        HttpResponse::build(self.status_code()).json(response)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;
    use crate::database::testing::ServerError;
    use crate::errors::post::PostError;
    use crate::errors::project::ProjectError;

    #[test]
    fn domain_errors_keep_their_status() {
        let error: FolioError = DatabaseError::Post(PostError::NotFound("hello".into())).into();
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_type(), "post_not_found");

        let error: FolioError = DatabaseError::Project(ProjectError::InvalidSlug("A B".into())).into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unique_violations_are_conflicts() {
        let error: FolioError = DatabaseError::from(ServerError::unique_violation("posts_slug_key")).into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert_eq!(error.error_type(), "conflict_error");

        let error: FolioError = DatabaseError::from(ServerError::new("42703", "column does not exist")).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn driver_errors_are_internal() {
        let error: FolioError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_type(), "database_error");
        assert_eq!(
            error.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
