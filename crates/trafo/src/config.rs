use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use thiserror::Error;
use trafo_mirror::queue::DEFAULT_CAPACITY;

const DEFAULT_DB_PATH: &str = ".trafo/registros.db";
const DEFAULT_PORT: u16 = 4830;
const DEFAULT_CREDENTIALS_PATH: &str = "google-credentials.json";
const DEFAULT_SHEET_NAME: &str = "Registros";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("spreadsheet mirror not configured: set GOOGLE_SPREADSHEET_ID")]
    SheetsMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub credentials_path: PathBuf,
    pub sheet_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: String,
    pub host: IpAddr,
    pub port: u16,
    pub sheets: Option<SheetsConfig>,
    pub mirror_capacity: usize,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get("TRAFO_DB_PATH")
            .or_else(|| {
                get("DATABASE_URL").map(|url| {
                    url.strip_prefix("sqlite://")
                        .or_else(|| url.strip_prefix("sqlite:"))
                        .unwrap_or(&url)
                        .to_string()
                })
            })
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let host = match get("TRAFO_HOST") {
            Some(value) => parse("TRAFO_HOST", &value)?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let port = match get("TRAFO_PORT") {
            Some(value) => parse("TRAFO_PORT", &value)?,
            None => DEFAULT_PORT,
        };
        let mirror_capacity = match get("TRAFO_MIRROR_QUEUE") {
            Some(value) => parse("TRAFO_MIRROR_QUEUE", &value)?,
            None => DEFAULT_CAPACITY,
        };
        if mirror_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "TRAFO_MIRROR_QUEUE",
                value: "0".to_string(),
                reason: "capacity must be at least 1".to_string(),
            });
        }

        let sheets = get("GOOGLE_SPREADSHEET_ID").map(|spreadsheet_id| SheetsConfig {
            spreadsheet_id,
            credentials_path: PathBuf::from(
                get("GOOGLE_CREDENTIALS_PATH")
                    .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string()),
            ),
            sheet_name: get("TRAFO_SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        });

        let log_filter = get("TRAFO_LOG")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let log_format = match get("TRAFO_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "TRAFO_LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected text or json".to_string(),
                });
            }
        };

        Ok(Self {
            db_path,
            host,
            port,
            sheets,
            mirror_capacity,
            log_filter,
            log_format,
        })
    }

    pub fn require_sheets(&self) -> Result<&SheetsConfig, ConfigError> {
        self.sheets.as_ref().ok_or(ConfigError::SheetsMissing)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}
