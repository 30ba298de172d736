use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// What happened to the cleaned text after a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpOutcome {
    NotRequested,
    Written(PathBuf),
    Failed { path: PathBuf, reason: String },
}

impl fmt::Display for DumpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => Ok(()),
            Self::Written(path) => write!(f, " (cleaned text written to {})", path.display()),
            Self::Failed { path, reason } => write!(
                f,
                " (could not write cleaned text to {}: {reason})",
                path.display()
            ),
        }
    }
}

/// Errors raised while decoding or resolving a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file could not be read
    #[error("Cannot read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compressed stream is corrupt
    #[error("Decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    /// Decompressed bytes are not UTF-8
    #[error("Snapshot is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Nothing left after stripping the leading garbage
    #[error("Snapshot contains no JSON object")]
    EmptyDocument,

    /// The cleaned text is not valid JSON
    #[error("Snapshot JSON parse error: {source}{dump}")]
    Parse {
        #[source]
        source: serde_json::Error,
        dump: DumpOutcome,
    },

    /// A `$ref` names a shared object that does not exist
    #[error("Reference to unknown shared object `{id}`")]
    DanglingReference { id: String },
}

impl SnapshotError {
    /// Whether the failure is about document integrity rather than decoding.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::DanglingReference { .. })
    }
}
