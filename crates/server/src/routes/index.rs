use actix_web::{get, post, web, HttpResponse};

use crate::routes::api_error;
use crate::state::AppState;
use crate::types::{RebuildResponse, StatsResponse};

#[get("/index/stats")]
pub async fn index_stats(
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let database = state
        .database
        .read()
        .map_err(|_| actix_web::error::ErrorInternalServerError("database lock poisoned"))?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_documents: database.document_count(),
        embedder: database.embedder_identifier(),
    }))
}

#[post("/index/rebuild")]
pub async fn rebuild_index(
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let state_clone = state.clone();
    let total_documents = web::block(move || {
        let mut database = state_clone
            .database
            .write()
            .map_err(|_| noter_common::NoterError::internal("database lock poisoned"))?;
        database.build_or_update_index()?;
        Ok::<usize, noter_common::NoterError>(database.document_count())
    })
    .await?
    .map_err(api_error)?;

    Ok(HttpResponse::Ok().json(RebuildResponse {
        success: true,
        total_documents,
    }))
}
