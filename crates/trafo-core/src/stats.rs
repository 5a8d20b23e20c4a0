use crate::catalog::{VISIT_TARGET, pole_for_agent};
use crate::error::StatsError;
use crate::types::{AgentSummary, DailyRollup, RankingEntry, RecordFilter, Totals, TodaySnapshot};
use chrono::NaiveDateTime;

pub trait StatsRepository {
    /// One summary per agent code, ordered by agent code.
    fn by_agent(&self, filter: &RecordFilter) -> Result<Vec<AgentSummary>, StatsError>;
    /// Distinct agent codes, ascending.
    fn agents(&self, filter: &RecordFilter) -> Result<Vec<String>, StatsError>;
    fn totals(&self, filter: &RecordFilter) -> Result<Totals, StatsError>;
    /// Calendar days that have records, ascending.
    fn daily(&self, filter: &RecordFilter) -> Result<Vec<DailyRollup>, StatsError>;
    /// Aggregates over the half-open `[start, end)` window.
    fn window(&self, start: NaiveDateTime, end: NaiveDateTime)
    -> Result<TodaySnapshot, StatsError>;
}

pub fn build_ranking(mut summaries: Vec<AgentSummary>) -> Vec<RankingEntry> {
    summaries.sort_by(|a, b| {
        b.total_visitas
            .cmp(&a.total_visitas)
            .then_with(|| a.prospector.cmp(&b.prospector))
    });
    summaries
        .into_iter()
        .enumerate()
        .map(|(index, summary)| RankingEntry {
            posicao: index + 1,
            polo: pole_for_agent(&summary.prospector).map(|pole| pole.name.to_string()),
            percentual_meta: percent_of(summary.total_visitas, VISIT_TARGET),
            eficiencia: efficiency(summary.total_apontamentos, summary.total_visitas),
            prospector: summary.prospector,
            total_visitas: summary.total_visitas,
            total_apontamentos: summary.total_apontamentos,
            registros: summary.registros,
            meta_visitas: VISIT_TARGET,
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn percent_of(value: i64, target: i64) -> i64 {
    if target <= 0 {
        return 0;
    }
    (value as f64 * 100.0 / target as f64).round() as i64
}

#[allow(clippy::cast_precision_loss)]
fn efficiency(findings: i64, visits: i64) -> f64 {
    if visits <= 0 {
        return 0.0;
    }
    (findings as f64 * 1000.0 / visits as f64).round() / 10.0
}
