//! Google Sheets v4 client authenticated with a service-account key file.

use crate::error::MirrorError;
use crate::row::SheetRow;
use crate::sink::SheetSink;
use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_json(value: &str) -> Result<Self, MirrorError> {
        serde_json::from_str(value).map_err(|err| MirrorError::Credentials {
            message: err.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, MirrorError> {
        let text = std::fs::read_to_string(path).map_err(|err| MirrorError::Credentials {
            message: format!("{}: {err}", path.display()),
        })?;
        Self::from_json(&text)
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub sheet_name: String,
}

impl SheetTarget {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn append_range(&self) -> String {
        format!("{}!A:Q", self.sheet_name)
    }

    pub fn header_range(&self) -> String {
        format!("{}!A1:Q1", self.sheet_name)
    }

    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, MirrorError> {
        let mut url = Url::parse(SHEETS_API).map_err(|err| MirrorError::Transport {
            message: err.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| MirrorError::Transport {
                message: "sheets api url cannot be a base".to_string(),
            })?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'static str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Serialize)]
struct ValueRange<'a> {
    values: Vec<&'a SheetRow>,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct GoogleSheetsSink {
    client: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    target: SheetTarget,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheetsSink {
    pub fn new(key: ServiceAccountKey, target: SheetTarget) -> Result<Self, MirrorError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|err| {
            MirrorError::Credentials {
                message: err.to_string(),
            }
        })?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| MirrorError::Transport {
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            key,
            encoding_key,
            target,
            token: Mutex::new(None),
        })
    }

    pub fn from_credentials_file(path: &Path, target: SheetTarget) -> Result<Self, MirrorError> {
        Self::new(ServiceAccountKey::from_file(path)?, target)
    }

    async fn access_token(&self) -> Result<String, MirrorError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }
        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn fetch_token(&self) -> Result<CachedToken, MirrorError> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: self.key.token_uri(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_TTL_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|err| MirrorError::Credentials {
                message: err.to_string(),
            })?;
        let response = self
            .client
            .post(self.key.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|err| MirrorError::Token {
                message: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MirrorError::Token {
                message: format!("HTTP {status}: {body}"),
            });
        }
        let token: TokenResponse = response.json().await.map_err(|err| MirrorError::Token {
            message: err.to_string(),
        })?;
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in - TOKEN_REFRESH_MARGIN_SECS),
        })
    }

    async fn send_values(
        &self,
        method: Method,
        url: Url,
        rows: Vec<&SheetRow>,
    ) -> Result<(), MirrorError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .request(method, url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&ValueRange { values: rows })
            .send()
            .await
            .map_err(|err| MirrorError::Transport {
                message: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MirrorError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

impl SheetSink for GoogleSheetsSink {
    fn append<'a>(&'a self, row: &'a SheetRow) -> BoxFuture<'a, Result<(), MirrorError>> {
        Box::pin(async move {
            let url = self
                .target
                .values_url(&self.target.append_range(), ":append")?;
            self.send_values(Method::POST, url, vec![row]).await
        })
    }

    fn write_headers(&self) -> BoxFuture<'_, Result<(), MirrorError>> {
        Box::pin(async move {
            let headers = SheetRow::headers();
            let url = self.target.values_url(&self.target.header_range(), "")?;
            self.send_values(Method::PUT, url, vec![&headers]).await
        })
    }
}
