use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{map_error, ErrorEnvelope};
use crate::routes::params::{FilterQuery, IdQuery, filter_from, id_from};
use crate::{with_dashboard, AppState};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use trafo_core::error::RecordError;
use trafo_core::types::{Record, RecordInput};
use trafo_core::TrafoError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/records",
            get(list_records)
                .post(create_record)
                .put(update_record)
                .delete(delete_record),
        )
        .with_state(state)
}

fn body_error(rejection: &JsonRejection) -> TrafoError {
    TrafoError::Record(RecordError::InvalidInput {
        message: rejection.body_text(),
    })
}

#[utoipa::path(
    get,
    path = "/api/records",
    params(FilterQuery),
    responses(
        (status = 200, body = Vec<Record>),
        (status = 400, body = ErrorEnvelope)
    )
)]
pub(crate) async fn list_records(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response {
    let filter = match filter_from(query) {
        Ok(filter) => filter,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    match with_dashboard(&state, move |dashboard| dashboard.records().list(&filter)).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/records",
    request_body = RecordInput,
    responses(
        (status = 201, body = Record),
        (status = 400, body = ErrorEnvelope)
    )
)]
pub(crate) async fn create_record(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            return map_error(&body_error(&rejection), Some(correlation.0)).into_response();
        }
    };
    match with_dashboard(&state, move |dashboard| dashboard.records().create(input)).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/records",
    params(IdQuery),
    request_body = RecordInput,
    responses(
        (status = 200, body = Record),
        (status = 400, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn update_record(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> Response {
    let query = match id_from(query) {
        Ok(query) => query,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            return map_error(&body_error(&rejection), Some(correlation.0)).into_response();
        }
    };
    let result = with_dashboard(&state, move |dashboard| {
        dashboard.records().update(query.id.as_deref(), input)
    })
    .await;
    match result {
        Ok(record) => Json(record).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/records",
    params(IdQuery),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 400, body = ErrorEnvelope)
    )
)]
pub(crate) async fn delete_record(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let query = match id_from(query) {
        Ok(query) => query,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    let result = with_dashboard(&state, move |dashboard| {
        dashboard.records().delete(query.id.as_deref())
    })
    .await;
    match result {
        Ok(()) => Json(DeleteResponse { success: true }).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}
