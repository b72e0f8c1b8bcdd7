pub mod index;
pub mod notes;
pub mod search;
pub mod similar;
pub mod summary;

use actix_web::http::StatusCode;
use noter_common::NoterError;

/// Convert an engine error into an actix error with the mapped status
pub(crate) fn api_error(e: NoterError) -> actix_web::Error {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    actix_web::error::InternalError::new(e.to_string(), status).into()
}

/// Reject note paths that escape the notes root
pub(crate) fn validate_note_path(path: &str) -> actix_web::Result<()> {
    if path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|part| part == "..")
    {
        return Err(actix_web::error::ErrorBadRequest("Invalid note path"));
    }
    Ok(())
}
