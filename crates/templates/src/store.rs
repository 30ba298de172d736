use crate::error::{Result, TemplateError};
use crate::localization::Localization;
use crate::source::{DataKind, DataSource, FsSource};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

type Outcome<T> = Option<std::result::Result<Arc<T>, Arc<TemplateError>>>;

enum Entry<T> {
    Ready(Arc<T>),
    Loading(watch::Receiver<Outcome<T>>),
}

/// Per-name single-flight cache.
///
/// The first caller for a name becomes the loader; callers arriving while it
/// runs wait on its outcome. Successes are kept forever, failures are
/// dropped so the next call retries.
struct FlightCache<T> {
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T> Default for FlightCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Send + Sync> FlightCache<T> {
    async fn get_or_load<F, Fut>(&self, name: &str, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        enum Lookup<T> {
            Wait(watch::Receiver<Outcome<T>>),
            Load(watch::Sender<Outcome<T>>),
        }

        let mut load = Some(load);
        loop {
            let lookup = {
                let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
                match guard.get(name) {
                    Some(Entry::Ready(value)) => return Ok(value.clone()),
                    Some(Entry::Loading(rx)) => Lookup::Wait(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        guard.insert(name.to_string(), Entry::Loading(rx));
                        Lookup::Load(tx)
                    }
                }
            };

            match lookup {
                Lookup::Wait(mut rx) => loop {
                    let current = rx.borrow().clone();
                    if let Some(outcome) = current {
                        return outcome.map_err(TemplateError::Shared);
                    }
                    if rx.changed().await.is_err() {
                        // Loader dropped without publishing; clear its entry and retry.
                        self.forget_stale(name, &rx);
                        break;
                    }
                },
                Lookup::Load(tx) => {
                    let Some(load) = load.take() else {
                        return Err(TemplateError::Abandoned {
                            name: name.to_string(),
                        });
                    };
                    let outcome = load().await.map(Arc::new);
                    {
                        let mut guard =
                            self.entries.lock().unwrap_or_else(PoisonError::into_inner);
                        match &outcome {
                            Ok(value) => {
                                guard.insert(name.to_string(), Entry::Ready(value.clone()));
                            }
                            Err(_) => {
                                guard.remove(name);
                            }
                        }
                    }
                    return match outcome {
                        Ok(value) => {
                            let _ = tx.send(Some(Ok(value.clone())));
                            Ok(value)
                        }
                        Err(err) => {
                            log::debug!("Load of `{name}` failed: {err}");
                            let shared = Arc::new(err);
                            let _ = tx.send(Some(Err(shared.clone())));
                            Err(TemplateError::Shared(shared))
                        }
                    };
                }
            }
        }
    }

    fn forget_stale(&self, name: &str, rx: &watch::Receiver<Outcome<T>>) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(guard.get(name), Some(Entry::Loading(current)) if current.same_channel(rx)) {
            guard.remove(name);
        }
    }

    fn ready_len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|e| matches!(e, Entry::Ready(_)))
            .count()
    }
}

/// Process-wide memoizing provider for template and localization files.
///
/// Construct once and share by reference. Each name is read from the
/// [`DataSource`] at most once after a successful load.
pub struct TemplateStore {
    source: Arc<dyn DataSource>,
    templates: FlightCache<Vec<Value>>,
    localizations: FlightCache<Localization>,
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("templates", &self.templates.ready_len())
            .field("localizations", &self.localizations.ready_len())
            .finish_non_exhaustive()
    }
}

impl TemplateStore {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            templates: FlightCache::default(),
            localizations: FlightCache::default(),
        }
    }

    /// Store backed by [`FsSource::from_env`]
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Arc::new(FsSource::from_env()?)))
    }

    /// Records of one JSON5 template file.
    ///
    /// A top-level array yields its elements; a single object yields a
    /// one-element set.
    pub async fn template_set(&self, name: &str) -> Result<Arc<Vec<Value>>> {
        self.templates
            .get_or_load(name, move || async move {
                let text = self.source.read(DataKind::Template, name).await?;
                let records = parse_template_text(name, &text)?;
                log::debug!("Loaded template `{name}` with {} records", records.len());
                Ok(records)
            })
            .await
    }

    pub async fn localization(&self, name: &str) -> Result<Arc<Localization>> {
        self.localizations
            .get_or_load(name, move || async move {
                let text = self.source.read(DataKind::Localization, name).await?;
                Ok(Localization::parse(&text))
            })
            .await
    }

    /// Number of successfully cached template sets
    #[must_use]
    pub fn cached_templates(&self) -> usize {
        self.templates.ready_len()
    }
}

fn parse_template_text(name: &str, text: &str) -> Result<Vec<Value>> {
    let value: Value = json5::from_str(text).map_err(|err| TemplateError::Parse {
        name: name.to_string(),
        message: err.to_string(),
    })?;
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(_) => Ok(vec![value]),
        other => Err(TemplateError::Parse {
            name: name.to_string(),
            message: format!("expected an array of records, found {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn json5_sets_accept_comments_and_trailing_commas() {
        let text = "// orgs\n[{dataName: 'Org_A', tier: 2,},]";
        let records = parse_template_text("TIOrgTemplate", text).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["dataName"], json!("Org_A"));
        assert_eq!(records[0]["tier"].as_f64(), Some(2.0));
    }

    #[test]
    fn scalar_template_file_is_rejected() {
        let err = parse_template_text("TIOrgTemplate", "42").unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn cached_set_is_read_once() {
        let source = Arc::new(MemorySource::new().with_template("TITechTemplate", "[]"));
        let store = TemplateStore::new(source.clone());
        let first = store.template_set("TITechTemplate").await.expect("first");
        let second = store.template_set("TITechTemplate").await.expect("second");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.read_count(), 1);
        assert_eq!(store.cached_templates(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let source = Arc::new(MemorySource::new());
        let store = TemplateStore::new(source.clone());
        assert!(store.template_set("TIMissing").await.unwrap_err().is_not_found());
        assert!(store.template_set("TIMissing").await.unwrap_err().is_not_found());
        assert_eq!(source.reads_of(DataKind::Template, "TIMissing"), 2);
        assert_eq!(store.cached_templates(), 0);
    }
}
