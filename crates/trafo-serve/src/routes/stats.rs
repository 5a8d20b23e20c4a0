use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{map_error, ErrorEnvelope};
use crate::routes::params::{FilterQuery, filter_from};
use crate::{with_dashboard, AppState};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use trafo_core::types::{DailyRollup, RankingEntry, Statistics, TodaySnapshot};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/statistics", get(statistics))
        .route("/evolution", get(evolution))
        .route("/today", get(today))
        .route("/ranking", get(ranking))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/statistics",
    params(FilterQuery),
    responses(
        (status = 200, body = Statistics),
        (status = 400, body = ErrorEnvelope)
    )
)]
pub(crate) async fn statistics(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let filter = match filter_from(query) {
        Ok(filter) => filter,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    match with_dashboard(&state, move |dashboard| dashboard.stats().statistics(&filter)).await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/evolution",
    params(FilterQuery),
    responses(
        (status = 200, body = Vec<DailyRollup>),
        (status = 400, body = ErrorEnvelope)
    )
)]
pub(crate) async fn evolution(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let filter = match filter_from(query) {
        Ok(filter) => filter,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    match with_dashboard(&state, move |dashboard| dashboard.stats().evolution(&filter)).await {
        Ok(days) => Json(days).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/today",
    responses((status = 200, body = TodaySnapshot))
)]
pub(crate) async fn today(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
) -> Response {
    match with_dashboard(&state, |dashboard| dashboard.stats().today()).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/ranking",
    params(FilterQuery),
    responses(
        (status = 200, body = Vec<RankingEntry>),
        (status = 400, body = ErrorEnvelope)
    )
)]
pub(crate) async fn ranking(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let filter = match filter_from(query) {
        Ok(filter) => filter,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    match with_dashboard(&state, move |dashboard| dashboard.stats().ranking(&filter)).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}
