use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

/// Normalization failures. All of them mean the snapshot is internally
/// inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Snapshot has no {anchor}")]
    MissingAnchor { anchor: String },

    #[error("Snapshot is missing the `{section}` section")]
    MissingSection { section: &'static str },

    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },
}

impl ModelError {
    pub(crate) fn anchor(anchor: impl Into<String>) -> Self {
        Self::MissingAnchor {
            anchor: anchor.into(),
        }
    }

    pub(crate) fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            reason: reason.into(),
        }
    }
}
