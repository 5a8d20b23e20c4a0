use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{map_error, ErrorEnvelope};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::Serialize;
use trafo_core::TrafoError;
use trafo_mirror::MirrorError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SheetInitResponse {
    pub success: bool,
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sheets/init", post(init_sheet))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/sheets/init",
    responses(
        (status = 200, body = SheetInitResponse),
        (status = 400, body = ErrorEnvelope),
        (status = 500, body = ErrorEnvelope)
    )
)]
pub(crate) async fn init_sheet(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
) -> Response {
    let Some(sink) = state.sheets.as_ref() else {
        let err = TrafoError::Mirror(MirrorError::NotConfigured);
        return map_error(&err, Some(correlation.0)).into_response();
    };
    match sink.write_headers().await {
        Ok(()) => {
            tracing::info!("spreadsheet header row written");
            Json(SheetInitResponse {
                success: true,
                message: "header row written".to_string(),
            })
            .into_response()
        }
        Err(err) => map_error(&TrafoError::from(err), Some(correlation.0)).into_response(),
    }
}
