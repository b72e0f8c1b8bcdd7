use actix_web::{get, web, HttpResponse};

use crate::routes::api_error;
use crate::state::AppState;
use crate::types::{SearchQuery, SearchResponse};

#[get("/search")]
pub async fn search(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let query = query.into_inner();
    if query.q.trim().is_empty() {
        return Err(actix_web::error::ErrorBadRequest("Query cannot be empty"));
    }

    let state_clone = state.clone();
    let q = query.q.clone();
    let results = web::block(move || {
        if query.regex {
            state_clone.searcher.regex_search(&query.q)
        } else {
            state_clone.searcher.text_search(&query.q)
        }
    })
    .await?
    .map_err(api_error)?;

    let count = results.len();
    Ok(HttpResponse::Ok().json(SearchResponse {
        results,
        query: q,
        count,
    }))
}
