use actix_web::{delete, get, put, web, HttpResponse};
use tracing::info;

use crate::routes::{api_error, validate_note_path};
use crate::state::AppState;
use crate::types::{DeleteResponse, NoteResponse, SaveNoteRequest, SimilarResponse};

#[get("/notes")]
pub async fn list_notes(
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let notes = state.storage.all_notes().map_err(api_error)?;
    Ok(HttpResponse::Ok().json(notes))
}

#[get("/notes/{path:.*}")]
pub async fn get_note(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let path = path.into_inner();
    validate_note_path(&path)?;

    let abs_path = state.storage.note_abs_path(&path);
    if !abs_path.exists() {
        return Err(actix_web::error::ErrorNotFound(format!(
            "Note {} not found",
            path
        )));
    }

    let content = std::fs::read_to_string(&abs_path)
        .map_err(|e| actix_web::error::ErrorInternalServerError(e))?;

    Ok(HttpResponse::Ok().json(NoteResponse { path, content }))
}

#[put("/notes/{path:.*}")]
pub async fn save_note(
    path: web::Path<String>,
    req: web::Json<SaveNoteRequest>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let path = path.into_inner();
    validate_note_path(&path)?;

    let abs_path = state.storage.note_abs_path(&path);
    if let Some(parent) = abs_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| actix_web::error::ErrorInternalServerError(e))?;
    }
    std::fs::write(&abs_path, &req.content)
        .map_err(|e| actix_web::error::ErrorInternalServerError(e))?;
    info!("Saved note: {}", path);

    // Refresh the index and respond with the new neighbors
    let state_clone = state.clone();
    let content = req.into_inner().content;
    let results = web::block(move || {
        let mut database = state_clone
            .database
            .write()
            .map_err(|_| noter_common::NoterError::internal("database lock poisoned"))?;
        database.build_or_update_index()?;
        database.find_similar(&content, 5)
    })
    .await?
    .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(SimilarResponse::from_results(results)))
}

#[delete("/notes/{path:.*}")]
pub async fn delete_note(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let path = path.into_inner();
    validate_note_path(&path)?;

    let abs_path = state.storage.note_abs_path(&path);
    if !abs_path.exists() {
        return Err(actix_web::error::ErrorNotFound(format!(
            "Note {} not found",
            path
        )));
    }

    std::fs::remove_file(&abs_path)
        .map_err(|e| actix_web::error::ErrorInternalServerError(e))?;
    info!("Deleted note: {}", path);

    // Update the index after deletion
    let state_clone = state.clone();
    web::block(move || {
        let mut database = state_clone
            .database
            .write()
            .map_err(|_| noter_common::NoterError::internal("database lock poisoned"))?;
        database.build_or_update_index()
    })
    .await?
    .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(DeleteResponse { success: true }))
}
