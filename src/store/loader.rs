use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::LoadError;

/// Where raw payload JSON comes from. Implementations fetch by file name;
/// the store layers caching on top, so a source is free to be dumb.
pub trait PayloadSource: Send + Sync {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

impl<S: PayloadSource> PayloadSource for Arc<S> {
    async fn fetch(&self, name: &str) -> Result<String, LoadError> {
        (**self).fetch(name).await
    }
}

/// Reads payloads from a directory of generated JSON files.
#[derive(Debug, Clone)]
pub struct FilePayloadSource {
    root: PathBuf,
}

impl FilePayloadSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl PayloadSource for FilePayloadSource {
    async fn fetch(&self, name: &str) -> Result<String, LoadError> {
        let path = self.root.join(name);
        debug!(path = %path.display(), "fetching payload");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Fetch {
                name: name.to_string(),
                source,
            })
    }
}

pub async fn fetch_json<S, T>(source: &S, name: &str) -> Result<T, LoadError>
where
    S: PayloadSource,
    T: DeserializeOwned,
{
    let raw = source.fetch(name).await?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        name: name.to_string(),
        source,
    })
}

/// A cache slot populated exactly once. Concurrent first loads are
/// serialized behind an async mutex and re-checked, so a second call while
/// or after the first returns the already-cached value without refetching.
/// `replace` swaps the whole value in one assignment; readers see either the
/// old value or the new one, never a partial state.
pub struct LazySlot<T> {
    value: RwLock<Option<Arc<T>>>,
    load_guard: Mutex<()>,
}

impl<T> LazySlot<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            load_guard: Mutex::new(()),
        }
    }

    /// Current value, or None when nothing has loaded yet.
    pub fn current(&self) -> Option<Arc<T>> {
        self.value.read().unwrap().clone()
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<T>, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, LoadError>>,
    {
        if let Some(value) = self.current() {
            return Ok(value);
        }
        let _guard = self.load_guard.lock().await;
        // A racing loader may have won while we waited for the guard.
        if let Some(value) = self.current() {
            return Ok(value);
        }
        let value = Arc::new(load().await?);
        *self.value.write().unwrap() = Some(value.clone());
        Ok(value)
    }

    pub fn replace(&self, value: Arc<T>) {
        *self.value.write().unwrap() = Some(value);
    }

    pub fn reset(&self) {
        *self.value.write().unwrap() = None;
    }
}

impl<T> Default for LazySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Developer-comment payload: flat key -> comment text map plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsPayload {
    #[serde(default)]
    pub comments: HashMap<String, String>,
    #[serde(default)]
    pub metadata: CommentsMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentsMetadata {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub total_comments: usize,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// XML usage payload: entries grouped by the XML tag that referenced a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlUsagePayload {
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub tag_groups: HashMap<String, Vec<XmlUsageEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlUsageEntry {
    pub csharp_class: String,
    #[serde(default)]
    pub csharp_file: String,
    pub xml_file: String,
    #[serde(default)]
    pub xml_value: String,
    #[serde(default)]
    pub xml_line: usize,
}

/// Translation payload: XML translation keys linked to the code that calls
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationPayload {
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub translation_links: HashMap<String, Vec<TranslationEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub csharp_file: String,
    #[serde(default)]
    pub csharp_line: usize,
    #[serde(default)]
    pub csharp_code: String,
    #[serde(default)]
    pub xml_files: Vec<String>,
}
