//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   POST   /jobs
//!   GET    /jobs?title=&minSalary=&hasEquity=
//!   GET    /jobs/:id
//!   PATCH  /jobs/:id
//!   DELETE /jobs/:id

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use db::{DbPool, JobStore, PgJobStore};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
}

impl AppState {
    pub fn new(jobs: impl JobStore + 'static) -> Self {
        Self { jobs: Arc::new(jobs) }
    }
}

/// Build the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/jobs", post(handlers::jobs::create).get(handlers::jobs::list))
        .route(
            "/jobs/:id",
            get(handlers::jobs::get)
                .patch(handlers::jobs::update)
                .delete(handlers::jobs::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind` and serve the API until the process is stopped.
pub async fn serve(bind: &str, pool: DbPool) -> std::io::Result<()> {
    let app = router(AppState::new(PgJobStore::new(pool)));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
