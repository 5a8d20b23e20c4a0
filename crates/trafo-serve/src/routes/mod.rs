pub mod catalog;
pub mod error;
pub mod params;
pub mod records;
pub mod sheets;
pub mod stats;

use crate::middleware::correlation::correlation_middleware;
use crate::{openapi, AppState};
use axum::middleware;
use axum::Router;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(records::router(state.clone()))
        .merge(stats::router(state.clone()))
        .merge(catalog::router())
        .merge(sheets::router(state))
        .merge(openapi::router())
        .route_layer(middleware::from_fn(correlation_middleware));

    Router::new().nest("/api", api)
}
