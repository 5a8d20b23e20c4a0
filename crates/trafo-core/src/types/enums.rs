use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RecordStatus {
    #[default]
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "executado")]
    Executed,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "em_andamento",
            Self::Executed => "executado",
        }
    }

    /// Accepts the stored names and their English aliases; anything else is in progress.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "executado" | "executed" => Self::Executed,
            _ => Self::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_falls_back_to_in_progress() {
        assert_eq!(RecordStatus::parse_lenient("executado"), RecordStatus::Executed);
        assert_eq!(RecordStatus::parse_lenient(" Executed "), RecordStatus::Executed);
        assert_eq!(RecordStatus::parse_lenient("em_andamento"), RecordStatus::InProgress);
        assert_eq!(RecordStatus::parse_lenient("whatever"), RecordStatus::InProgress);
    }

    #[test]
    fn serializes_with_stored_names() {
        let json = serde_json::to_string(&RecordStatus::Executed).unwrap();
        assert_eq!(json, "\"executado\"");
        let parsed: RecordStatus = serde_json::from_str("\"em_andamento\"").unwrap();
        assert_eq!(parsed, RecordStatus::InProgress);
    }
}
