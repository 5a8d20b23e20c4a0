use utoipa::OpenApi;

use crate::routes::error::ErrorEnvelope;
use crate::routes::records::DeleteResponse;
use crate::routes::sheets::SheetInitResponse;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use trafo_core::types::{
    AgentSummary, DailyRollup, PoleCatalog, PoleInfo, RankingEntry, Record, RecordId,
    RecordInput, RecordStatus, Statistics, Totals, TodaySnapshot,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::records::list_records,
        crate::routes::records::create_record,
        crate::routes::records::update_record,
        crate::routes::records::delete_record,
        crate::routes::stats::statistics,
        crate::routes::stats::evolution,
        crate::routes::stats::today,
        crate::routes::stats::ranking,
        crate::routes::catalog::poles,
        crate::routes::sheets::init_sheet,
    ),
    components(schemas(
        Record,
        RecordId,
        RecordInput,
        RecordStatus,
        AgentSummary,
        Totals,
        Statistics,
        DailyRollup,
        TodaySnapshot,
        RankingEntry,
        PoleInfo,
        PoleCatalog,
        ErrorEnvelope,
        DeleteResponse,
        SheetInitResponse,
    )),
    tags((name = "trafo", description = "Field prospecting productivity API"))
)]
pub struct ApiDoc;

pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Pretty-printed document for the `openapi` subcommand.
pub fn document() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}
