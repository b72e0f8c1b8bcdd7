use actix_web::{get, post, web, HttpResponse};

use crate::routes::{api_error, validate_note_path};
use crate::state::AppState;
use crate::types::{SummaryResponse, SummaryTextRequest};

#[get("/summary/{path:.*}")]
pub async fn note_summary(
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

    let state_clone = state.clone();
    let summary = web::block(move || state_clone.summarizer.summarize_file(&abs_path, None))
        .await?
        .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(SummaryResponse { summary }))
}

#[post("/summary")]
pub async fn text_summary(
    req: web::Json<SummaryTextRequest>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let text = req.into_inner().text;
    if text.trim().is_empty() {
        return Err(actix_web::error::ErrorBadRequest("Text cannot be empty"));
    }

    let state_clone = state.clone();
    let summary = web::block(move || state_clone.summarizer.summarize_text(&text, None))
        .await?
        .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(SummaryResponse { summary }))
}
