use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Weights are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid weights: {message}")]
    Invalid { message: String },
}
