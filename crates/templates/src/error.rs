use crate::source::DataKind;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors raised by template and localization loading
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A required environment variable is unset
    #[error("Template data location is not configured: set {var}")]
    NotConfigured { var: &'static str },

    /// The named resource does not exist
    #[error("{kind} `{name}` not found at {}", .path.display())]
    NotFound {
        kind: DataKind,
        name: String,
        path: PathBuf,
    },

    /// The resource exists but could not be read
    #[error("Cannot read {kind} `{name}` from {}: {source}", .path.display())]
    Io {
        kind: DataKind,
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template file is not valid JSON5
    #[error("Cannot parse template `{name}`: {message}")]
    Parse { name: String, message: String },

    /// A record does not have the expected shape
    #[error("Template `{name}` has an invalid record: {message}")]
    InvalidRecord { name: String, message: String },

    /// The load this call waited on failed in another task
    #[error(transparent)]
    Shared(Arc<TemplateError>),

    /// The loading task went away before publishing a result
    #[error("Load of `{name}` was abandoned")]
    Abandoned { name: String },
}

impl TemplateError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::NotConfigured { .. } => true,
            Self::Shared(inner) => inner.is_configuration(),
            _ => false,
        }
    }
}
