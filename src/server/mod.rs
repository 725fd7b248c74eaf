pub mod handlers;

use actix_web::{web, App, HttpServer};

use crate::config::Config;
use crate::logger;
use crate::orchestrator::Orchestrator;

pub const DEFAULT_PORT: u16 = 8080;

/// Shared per-worker state. The orchestrator is cheap to clone; the underlying
/// HTTP connection pool is shared.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

/// Binds the HTTP server and serves until shutdown.
pub async fn serve(config: &Config, orchestrator: Orchestrator) -> std::io::Result<()> {
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let state = web::Data::new(AppState { orchestrator });

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/api/generate", web::post().to(handlers::generate))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
