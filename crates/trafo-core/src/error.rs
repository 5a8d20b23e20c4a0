use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record not found")]
    NotFound,
    #[error("missing record identifier")]
    MissingId,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum TrafoError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Mirror(#[from] trafo_mirror::MirrorError),
    #[error("internal error: {message}")]
    Internal { message: String },
}
