use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown lifecycle phase: {0}")]
    UnknownPhase(String),

    #[error("unknown selection mode: {0}")]
    UnknownMode(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
