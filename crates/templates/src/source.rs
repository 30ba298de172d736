use crate::error::{Result, TemplateError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const DATA_DIR_VAR: &str = "STRATEGIST_DATA_DIR";
pub const LANGUAGE_VAR: &str = "STRATEGIST_LANG";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Template,
    Localization,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => f.write_str("template"),
            Self::Localization => f.write_str("localization"),
        }
    }
}

/// Durable storage behind the template cache
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Read the raw text of one named resource
    async fn read(&self, kind: DataKind, name: &str) -> Result<String>;
}

/// Template directory on disk.
///
/// Layout: `<root>/Templates/<Name>.json` and
/// `<root>/Localization/<lang>/<Name>.<lang>`.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    language: String,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            language: language.into(),
        }
    }

    /// Build from `STRATEGIST_DATA_DIR` and `STRATEGIST_LANG`
    pub fn from_env() -> Result<Self> {
        let root = std::env::var_os(DATA_DIR_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(TemplateError::NotConfigured { var: DATA_DIR_VAR })?;
        Ok(Self::new(PathBuf::from(root), Self::language_from_env()))
    }

    /// `STRATEGIST_LANG` when set and non-blank, else the default language
    #[must_use]
    pub fn language_from_env() -> String {
        std::env::var(LANGUAGE_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn path_for(&self, kind: DataKind, name: &str) -> PathBuf {
        match kind {
            DataKind::Template => self.root.join("Templates").join(format!("{name}.json")),
            DataKind::Localization => self
                .root
                .join("Localization")
                .join(&self.language)
                .join(format!("{name}.{}", self.language)),
        }
    }
}

#[async_trait]
impl DataSource for FsSource {
    async fn read(&self, kind: DataKind, name: &str) -> Result<String> {
        let path = self.path_for(kind, name);
        log::debug!("Reading {kind} `{name}` from {}", path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound {
                    kind,
                    name: name.to_string(),
                    path,
                })
            }
            Err(source) => Err(TemplateError::Io {
                kind,
                name: name.to_string(),
                path,
                source,
            }),
        }
    }
}

/// In-memory source that counts every read
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<(DataKind, String), String>,
    delay: Option<Duration>,
    reads: AtomicUsize,
    reads_by_name: Mutex<HashMap<(DataKind, String), usize>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template(mut self, name: &str, text: impl Into<String>) -> Self {
        self.files
            .insert((DataKind::Template, name.to_string()), text.into());
        self
    }

    #[must_use]
    pub fn with_localization(mut self, name: &str, text: impl Into<String>) -> Self {
        self.files
            .insert((DataKind::Localization, name.to_string()), text.into());
        self
    }

    /// Sleep before answering each read, to widen race windows in tests
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn reads_of(&self, kind: DataKind, name: &str) -> usize {
        self.reads_by_name
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&(kind, name.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn read(&self, kind: DataKind, name: &str) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        *self
            .reads_by_name
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry((kind, name.to_string()))
            .or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.files
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                kind,
                name: name.to_string(),
                path: PathBuf::from(format!("memory://{kind}/{name}")),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fs_layout_follows_language() {
        let source = FsSource::new("/data", "de");
        assert_eq!(
            source.path_for(DataKind::Template, "TIOrgTemplate"),
            PathBuf::from("/data/Templates/TIOrgTemplate.json")
        );
        assert_eq!(
            source.path_for(DataKind::Localization, "TIOrgTemplate"),
            PathBuf::from("/data/Localization/de/TIOrgTemplate.de")
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let temp = TempDir::new().expect("tempdir");
        let source = FsSource::new(temp.path(), "en");
        let err = source
            .read(DataKind::Template, "TINothing")
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
        assert!(err.to_string().contains("TINothing"));
    }

    #[tokio::test]
    async fn memory_source_counts_reads() {
        let source = MemorySource::new().with_template("A", "[]");
        source.read(DataKind::Template, "A").await.expect("read");
        let _ = source.read(DataKind::Template, "B").await;
        assert_eq!(source.read_count(), 2);
        assert_eq!(source.reads_of(DataKind::Template, "A"), 1);
        assert_eq!(source.reads_of(DataKind::Localization, "A"), 0);
    }
}
