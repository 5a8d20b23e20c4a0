use axum::routing::get;
use axum::{Json, Router};
use trafo_core::catalog::catalog;
use trafo_core::types::PoleCatalog;

pub fn router() -> Router {
    Router::new().route("/poles", get(poles))
}

#[utoipa::path(
    get,
    path = "/api/poles",
    responses((status = 200, body = PoleCatalog))
)]
pub(crate) async fn poles() -> Json<PoleCatalog> {
    Json(catalog())
}
