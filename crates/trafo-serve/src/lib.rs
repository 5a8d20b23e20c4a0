pub mod middleware;
pub mod openapi;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trafo_core::{Dashboard, TrafoError};
use trafo_db::schema;
use trafo_db::store::DbStore;
use trafo_mirror::{MirrorQueue, SheetSink};

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub mirror: MirrorQueue,
    /// Present only when a spreadsheet is configured.
    pub sheets: Option<Arc<dyn SheetSink>>,
}

impl AppState {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            mirror: MirrorQueue::disabled(),
            sheets: None,
        }
    }

    #[must_use]
    pub fn with_sheets(self, sink: Arc<dyn SheetSink>, capacity: usize) -> Self {
        Self {
            mirror: MirrorQueue::spawn(sink.clone(), capacity),
            sheets: Some(sink),
            ..self
        }
    }
}

/// Opens a fresh connection and makes sure the schema exists.
pub fn build_dashboard(state: &AppState) -> Result<Dashboard<DbStore>, TrafoError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| TrafoError::Internal {
        message: err.to_string(),
    })?;
    Ok(Dashboard::new(DbStore::new(conn), state.mirror.clone()))
}

/// Runs `f` against a per-request dashboard on the blocking pool.
pub async fn with_dashboard<T, F>(state: &AppState, f: F) -> Result<T, TrafoError>
where
    T: Send + 'static,
    F: FnOnce(&Dashboard<DbStore>) -> Result<T, TrafoError> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let dashboard = build_dashboard(&state)?;
        f(&dashboard)
    })
    .await
    .map_err(|err| TrafoError::Internal {
        message: err.to_string(),
    })?
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, db = %state.db_path, mirror = state.mirror.is_enabled(), "dashboard api listening");
    axum::serve(listener, app(state)).await
}
