use actix_web::HttpResponse;

use crate::errors::FolioError;

pub async fn not_found() -> Result<HttpResponse, FolioError> {
    Err(FolioError::NotFound)
}
