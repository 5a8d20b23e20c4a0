use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use serde::Deserialize;
use trafo_core::TrafoError;
use trafo_core::coerce::parse_calendar_date;
use trafo_core::error::{RecordError, StatsError};
use trafo_core::types::RecordFilter;
use utoipa::IntoParams;

/// Shared `?dataInicio&dataFim&prospector&polo` query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// First day, inclusive (`YYYY-MM-DD` or RFC 3339).
    pub data_inicio: Option<String>,
    /// Last day, inclusive.
    pub data_fim: Option<String>,
    pub prospector: Option<String>,
    pub polo: Option<String>,
}

impl FilterQuery {
    pub fn to_filter(&self) -> Result<RecordFilter, StatsError> {
        Ok(RecordFilter::new()
            .with_start_date(parse_day(self.data_inicio.as_deref(), "dataInicio")?)
            .with_end_date(parse_day(self.data_fim.as_deref(), "dataFim")?)
            .with_agent_code(self.prospector.as_deref())
            .with_pole(self.polo.as_deref()))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Unwraps an extracted filter query; rejections become `invalid_input`.
pub fn filter_from(
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<RecordFilter, TrafoError> {
    let Query(query) = query.map_err(|rejection| query_error(&rejection))?;
    Ok(query.to_filter()?)
}

pub fn id_from(query: Result<Query<IdQuery>, QueryRejection>) -> Result<IdQuery, TrafoError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| query_error(&rejection))
}

fn query_error(rejection: &QueryRejection) -> TrafoError {
    TrafoError::Record(RecordError::InvalidInput {
        message: rejection.body_text(),
    })
}

fn parse_day(
    value: Option<&str>,
    name: &str,
) -> Result<Option<chrono::NaiveDate>, StatsError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(text) => parse_calendar_date(text)
            .map(Some)
            .ok_or_else(|| StatsError::InvalidInput {
                message: format!("{name} is not a valid date: {text}"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn blank_dates_are_ignored() {
        let query = FilterQuery {
            data_inicio: Some(String::new()),
            ..FilterQuery::default()
        };
        assert_eq!(query.to_filter().unwrap(), RecordFilter::new());
    }

    #[test]
    fn dates_parse_to_calendar_days() {
        let query = FilterQuery {
            data_inicio: Some("2026-01-01".to_string()),
            data_fim: Some("2026-01-31T10:00:00".to_string()),
            prospector: Some("PAP801".to_string()),
            polo: None,
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.start_date(), NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(filter.end_date(), NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(filter.agent_code(), Some("PAP801"));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let query = FilterQuery {
            data_fim: Some("31/01/2026".to_string()),
            ..FilterQuery::default()
        };
        let err = query.to_filter().unwrap_err();
        assert!(err.to_string().contains("dataFim"));
    }
}
