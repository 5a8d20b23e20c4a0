use crate::coerce;
use crate::types::enums::RecordStatus;
use crate::types::ids::RecordId;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted productivity record.
///
/// `date` is the business wall-clock time in the server's local zone, which
/// may differ from `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    pub id: RecordId,
    #[serde(rename = "data")]
    pub date: NaiveDateTime,
    #[serde(rename = "prospector")]
    pub agent_code: String,
    #[serde(rename = "polo")]
    pub pole: String,
    #[serde(rename = "prefixo")]
    pub prefix: String,
    #[serde(rename = "trafo")]
    pub transformer_ref: Option<String>,
    #[serde(rename = "visitas")]
    pub visits: i64,
    #[serde(rename = "cod100")]
    pub code100: i64,
    #[serde(rename = "cod200")]
    pub code200: i64,
    #[serde(rename = "cod300")]
    pub code300: i64,
    #[serde(rename = "clandestino")]
    pub clandestine: i64,
    #[serde(rename = "inclusao")]
    pub inclusions: i64,
    #[serde(rename = "exclusao")]
    pub exclusions: i64,
    pub ip: i64,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    pub status: RecordStatus,
    #[serde(rename = "totalApontamentos")]
    pub total_apontamentos: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn from_draft(
        id: RecordId,
        draft: RecordDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            date: draft.date,
            agent_code: draft.agent_code,
            pole: draft.pole,
            prefix: draft.prefix,
            transformer_ref: draft.transformer_ref,
            visits: draft.visits,
            code100: draft.code100,
            code200: draft.code200,
            code300: draft.code300,
            clandestine: draft.clandestine,
            inclusions: draft.inclusions,
            exclusions: draft.exclusions,
            ip: draft.ip,
            notes: draft.notes,
            status: draft.status,
            total_apontamentos: draft.total_apontamentos,
            created_at,
            updated_at,
        }
    }
}

/// Normalized record contents ready to be written; see `normalize::draft_from_input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub date: NaiveDateTime,
    pub agent_code: String,
    pub pole: String,
    pub prefix: String,
    pub transformer_ref: Option<String>,
    pub visits: i64,
    pub code100: i64,
    pub code200: i64,
    pub code300: i64,
    pub clandestine: i64,
    pub inclusions: i64,
    pub exclusions: i64,
    pub ip: i64,
    pub notes: Option<String>,
    pub status: RecordStatus,
    pub total_apontamentos: i64,
}

/// Client payload for create and edit-replace.
///
/// Every field is optional and tolerant: malformed counters become 0, an
/// unreadable date becomes "now", and client-sent totals, prefixes or ids
/// are ignored because they are recomputed server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct RecordInput {
    #[serde(rename = "data", default, deserialize_with = "coerce::de::date")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDateTime>,
    #[serde(rename = "prospector", default, deserialize_with = "coerce::de::text")]
    pub agent_code: Option<String>,
    #[serde(rename = "polo", default, deserialize_with = "coerce::de::text")]
    pub pole: Option<String>,
    #[serde(rename = "trafo", default, deserialize_with = "coerce::de::text")]
    pub transformer_ref: Option<String>,
    #[serde(rename = "visitas", default, deserialize_with = "coerce::de::count")]
    pub visits: i64,
    #[serde(rename = "cod100", default, deserialize_with = "coerce::de::count")]
    pub code100: i64,
    #[serde(rename = "cod200", default, deserialize_with = "coerce::de::count")]
    pub code200: i64,
    #[serde(rename = "cod300", default, deserialize_with = "coerce::de::count")]
    pub code300: i64,
    #[serde(rename = "clandestino", default, deserialize_with = "coerce::de::count")]
    pub clandestine: i64,
    #[serde(rename = "inclusao", default, deserialize_with = "coerce::de::count")]
    pub inclusions: i64,
    #[serde(rename = "exclusao", default, deserialize_with = "coerce::de::count")]
    pub exclusions: i64,
    #[serde(default, deserialize_with = "coerce::de::count")]
    pub ip: i64,
    #[serde(rename = "observacoes", default, deserialize_with = "coerce::de::text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "coerce::de::status")]
    pub status: RecordStatus,
}
