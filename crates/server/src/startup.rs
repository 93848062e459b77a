use std::future::Future;

use axum::Router;
use common::utils::logging;
use configs::{AppConfig, LogFormat};
use service::item_store::ItemStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::openapi;
use crate::routes::{self, AppState};

pub fn init_logging(format: LogFormat) {
    if logging::init_logging(format) {
        info!(service = "server", event = "logger_init", ?format, "tracing subscriber initialized");
    }
}

/// Any origin, method and header; credentials allowed.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the application with a fresh, empty item store.
pub fn build_app(cfg: &AppConfig) -> Router {
    let state = AppState::new(ItemStore::new());
    routes::build_router(state, build_cors(), openapi::api_doc(&cfg.api))
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: bind the configured address and run until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind = cfg.bind_addr();
    let listener = TcpListener::bind(bind.as_str())
        .await
        .map_err(|source| StartupError::Bind { addr: bind.clone(), source })?;
    let addr = listener.local_addr().map_err(|source| StartupError::Bind { addr: bind, source })?;
    let app = build_app(&cfg);
    info!(%addr, title = %cfg.api.title, "starting item service");
    serve(listener, app, shutdown).await?;
    info!("item service stopped");
    Ok(())
}
