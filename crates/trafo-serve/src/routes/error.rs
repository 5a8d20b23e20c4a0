use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use trafo_core::error::{RecordError, StatsError};
use trafo_core::TrafoError;
use trafo_mirror::MirrorError;
use utoipa::ToSchema;

const GENERIC_MESSAGE: &str = "internal server error";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub error: String,
    #[schema(value_type = String)]
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Storage and internal failures are logged in full and reported generically.
pub fn map_error(
    err: &TrafoError,
    correlation_id: Option<String>,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code, message) = match err {
        TrafoError::Record(record) => map_record_error(record),
        TrafoError::Stats(stats) => map_stats_error(stats),
        TrafoError::Mirror(mirror) => map_mirror_error(mirror),
        TrafoError::Internal { .. } => internal(),
    };

    if status.is_server_error() {
        tracing::error!(
            correlation_id = correlation_id.as_deref().unwrap_or("-"),
            error = %err,
            "request failed"
        );
    }

    (
        status,
        Json(ErrorEnvelope {
            error: message,
            code,
            correlation_id,
        }),
    )
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        GENERIC_MESSAGE.to_string(),
    )
}

fn map_record_error(err: &RecordError) -> (StatusCode, &'static str, String) {
    match err {
        RecordError::NotFound => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
        RecordError::MissingId => (StatusCode::BAD_REQUEST, "missing_id", err.to_string()),
        RecordError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        RecordError::Storage { .. } => internal(),
    }
}

fn map_stats_error(err: &StatsError) -> (StatusCode, &'static str, String) {
    match err {
        StatsError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        StatsError::Storage { .. } => internal(),
    }
}

fn map_mirror_error(err: &MirrorError) -> (StatusCode, &'static str, String) {
    match err {
        MirrorError::NotConfigured => (StatusCode::BAD_REQUEST, "not_configured", err.to_string()),
        _ => internal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_hide_details() {
        let err = TrafoError::Stats(StatsError::Storage {
            message: "disk I/O error at /secret/path".to_string(),
        });
        let (status, Json(body)) = map_error(&err, Some("corr_1".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, GENERIC_MESSAGE);
        assert_eq!(body.correlation_id.as_deref(), Some("corr_1"));
    }

    #[test]
    fn client_errors_keep_their_message() {
        let (status, Json(body)) = map_error(&TrafoError::Record(RecordError::MissingId), None);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "missing_id");
        assert_eq!(body.error, "missing record identifier");

        let (status, _) = map_error(&TrafoError::Record(RecordError::NotFound), None);
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, Json(body)) = map_error(&TrafoError::Mirror(MirrorError::NotConfigured), None);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "not_configured");
    }
}
