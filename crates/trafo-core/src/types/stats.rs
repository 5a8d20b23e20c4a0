use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub prospector: String,
    pub total_visitas: i64,
    pub total_apontamentos: i64,
    pub cod100: i64,
    pub cod200: i64,
    pub cod300: i64,
    pub clandestino: i64,
    pub inclusao: i64,
    pub exclusao: i64,
    pub registros: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_visitas: i64,
    pub total_apontamentos: i64,
    pub cod100: i64,
    pub cod200: i64,
    pub cod300: i64,
    pub clandestino: i64,
    pub inclusao: i64,
    pub exclusao: i64,
    pub total_registros: i64,
    pub total_prospectores: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub por_prospector: Vec<AgentSummary>,
    pub prospectores: Vec<String>,
    pub totais: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyRollup {
    pub data: NaiveDate,
    pub visitas: i64,
    pub apontamentos: i64,
    pub prospectores: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub visitas: i64,
    pub apontamentos: i64,
    pub prospectores_ativos: i64,
    pub trafos: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub posicao: usize,
    pub prospector: String,
    pub polo: Option<String>,
    pub total_visitas: i64,
    pub total_apontamentos: i64,
    pub registros: i64,
    pub meta_visitas: i64,
    pub percentual_meta: i64,
    /// Findings per hundred visits, one decimal.
    pub eficiencia: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PoleInfo {
    pub id: String,
    pub nome: String,
    pub prefixos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoleCatalog {
    pub polos: Vec<PoleInfo>,
    pub meta_visitas: i64,
}
