//! Noter HTTP server
//!
//! Small local JSON API over the note database, summarizer and searcher.
//! All state is built once at startup and injected into handlers; the
//! synchronous engine runs on the blocking pool behind a lock.

mod routes;
mod state;
mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use noter_common::{AppConfig, Result};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Start the HTTP server, building the index first
///
/// State construction happens before the async runtime comes up: the engine
/// and its model clients are blocking, and must never run on a runtime
/// thread. Handlers reach them through the blocking pool instead.
pub fn start_server(config: AppConfig) -> Result<()> {
    let bind_address = config.server_bind_address();
    let state = web::Data::new(AppState::new(config)?);

    info!("Starting server on {}", bind_address);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            // Local tool; the UI is served from the same machine
            let cors = Cors::permissive();

            App::new()
                .wrap(TracingLogger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(routes::notes::list_notes)
                .service(routes::notes::get_note)
                .service(routes::notes::save_note)
                .service(routes::notes::delete_note)
                .service(routes::similar::similar_to_note)
                .service(routes::similar::similar_to_text)
                .service(routes::summary::note_summary)
                .service(routes::summary::text_summary)
                .service(routes::search::search)
                .service(routes::index::index_stats)
                .service(routes::index::rebuild_index)
        })
        .bind(&bind_address)?
        .run()
        .await
    })?;

    Ok(())
}
