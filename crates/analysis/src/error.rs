use serde::Serialize;
use strategist_model::ModelError;
use strategist_snapshot::SnapshotError;
use strategist_templates::TemplateError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure classes of one analysis invocation. All are fatal to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The blob could not be decompressed, read or parsed
    Decode,
    /// The document is internally inconsistent or lacks an anchor
    Integrity,
    /// A required location or setting is missing or invalid
    Configuration,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Templates(#[from] TemplateError),

    #[error("Invalid analysis config: {message}")]
    InvalidConfig { message: String },
}

impl AnalysisError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Snapshot(err) if err.is_integrity() => ErrorKind::Integrity,
            Self::Snapshot(_) => ErrorKind::Decode,
            Self::Model(_) => ErrorKind::Integrity,
            Self::Templates(err) if err.is_configuration() => ErrorKind::Configuration,
            // Unreadable template data is a decode failure of that collaborator.
            Self::Templates(_) => ErrorKind::Decode,
            Self::InvalidConfig { .. } => ErrorKind::Configuration,
        }
    }
}
