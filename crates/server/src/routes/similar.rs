use actix_web::{get, post, web, HttpResponse};

use crate::routes::{api_error, validate_note_path};
use crate::state::AppState;
use crate::types::{SimilarQuery, SimilarResponse, SimilarTextRequest};

const DEFAULT_N: usize = 5;

#[get("/similar/{path:.*}")]
pub async fn similar_to_note(
    path: web::Path<String>,
    query: web::Query<SimilarQuery>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let path = path.into_inner();
    validate_note_path(&path)?;
    let n = query.n.unwrap_or(DEFAULT_N);

    let state_clone = state.clone();
    let results = web::block(move || {
        let abs_path = state_clone.storage.note_abs_path(&path);
        let mut database = state_clone
            .database
            .write()
            .map_err(|_| noter_common::NoterError::internal("database lock poisoned"))?;
        database.find_similar_to_file(&abs_path, n)
    })
    .await?
    .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(SimilarResponse::from_results(results)))
}

#[post("/similar")]
pub async fn similar_to_text(
    req: web::Json<SimilarTextRequest>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let req = req.into_inner();
    let n = req.n.unwrap_or(DEFAULT_N);

    let state_clone = state.clone();
    let results = web::block(move || {
        let mut database = state_clone
            .database
            .write()
            .map_err(|_| noter_common::NoterError::internal("database lock poisoned"))?;
        database.find_similar(&req.text, n)
    })
    .await?
    .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(SimilarResponse::from_results(results)))
}
