use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("spreadsheet mirror not configured")]
    NotConfigured,
    #[error("invalid credentials: {message}")]
    Credentials { message: String },
    #[error("token exchange failed: {message}")]
    Token { message: String },
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("sheets api rejected request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
