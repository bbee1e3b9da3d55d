use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::index::CatalogIndex;
use crate::catalog::keys::KeyScheme;
use crate::catalog::records::{CatalogPayload, MemberRecord, TypeRecord};
use crate::config::Config;
use crate::error::LoadError;
use crate::search::{SearchEngine, SearchResult};
use crate::store::loader::{
    CommentsPayload, LazySlot, PayloadSource, TranslationEntry, TranslationPayload,
    XmlUsageEntry, XmlUsagePayload, fetch_json,
};

/// One loaded catalog generation: the raw payload and the index built from
/// it, swapped in and out together.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub payload: CatalogPayload,
    pub index: CatalogIndex,
}

/// Process-wide documentation store.
///
/// Empty at start, populated once per successful load, invalidated wholesale
/// on reload. The catalog slot holds payload + index behind one `Arc`, so
/// readers either see a complete generation or none at all. Collaborator
/// payloads (comments, XML usage, translations) load lazily and degrade to
/// empty lookups when missing.
pub struct DocStore<S> {
    config: Config,
    source: S,
    catalog: LazySlot<LoadedCatalog>,
    comments: LazySlot<CommentsPayload>,
    xml_links: LazySlot<XmlUsagePayload>,
    translations: LazySlot<TranslationPayload>,
    search: SearchEngine,
    keys: KeyScheme,
}

impl<S: PayloadSource> DocStore<S> {
    pub fn new(config: Config, source: S) -> Self {
        let search = SearchEngine::new(config.search.clone());
        let keys = KeyScheme::new(
            config.keys.comment_prefix.clone(),
            config.keys.default_namespace.clone(),
        );
        Self {
            config,
            source,
            catalog: LazySlot::new(),
            comments: LazySlot::new(),
            xml_links: LazySlot::new(),
            translations: LazySlot::new(),
            search,
            keys,
        }
    }

    /// Load the main catalog and build its index, unless already loaded.
    pub async fn ensure_loaded(&self) -> Result<Arc<LoadedCatalog>, LoadError> {
        self.catalog
            .get_or_load(|| async {
                let loaded = self.load_catalog().await?;
                info!("{}", loaded.index.stats());
                Ok(loaded)
            })
            .await
    }

    /// Current catalog generation, or None before the first load.
    pub fn current(&self) -> Option<Arc<LoadedCatalog>> {
        self.catalog.current()
    }

    /// Discard the current generation and swap in a freshly built one. The
    /// new index is built completely before the single-reference swap, and
    /// the search cache is dropped with the old corpus.
    pub async fn reload(&self) -> Result<Arc<LoadedCatalog>, LoadError> {
        let loaded = Arc::new(self.load_catalog().await?);
        self.catalog.replace(loaded.clone());
        self.search.reset();
        info!("catalog reloaded: {}", loaded.index.stats());
        Ok(loaded)
    }

    async fn load_catalog(&self) -> Result<LoadedCatalog, LoadError> {
        let payload: CatalogPayload =
            fetch_json(&self.source, &self.config.data.catalog_file).await?;
        let index = CatalogIndex::build(&payload.types);
        Ok(LoadedCatalog { payload, index })
    }

    /// Search the loaded corpus. An unloaded store yields no results.
    pub async fn search(&self, query: &str) -> Arc<Vec<SearchResult>> {
        match self.current() {
            Some(loaded) => self.search.search(query, &loaded.payload.types).await,
            None => Arc::new(Vec::new()),
        }
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search
    }

    pub fn key_scheme(&self) -> &KeyScheme {
        &self.keys
    }

    pub async fn ensure_comments(&self) -> Result<Arc<CommentsPayload>, LoadError> {
        self.comments
            .get_or_load(|| fetch_json(&self.source, &self.config.data.comments_file))
            .await
    }

    /// Developer comment for a type, if one was authored. Absence of the
    /// whole payload is treated the same as absence of the key.
    pub async fn comment_for_type(&self, record: &TypeRecord) -> Option<String> {
        let payload = self.comments_or_empty().await?;
        payload.comments.get(&self.keys.comment_key(record)).cloned()
    }

    pub async fn comment_for_member(
        &self,
        record: &TypeRecord,
        member: &MemberRecord,
    ) -> Option<String> {
        let payload = self.comments_or_empty().await?;
        payload
            .comments
            .get(&self.keys.member_comment_key(record, member))
            .cloned()
    }

    async fn comments_or_empty(&self) -> Option<Arc<CommentsPayload>> {
        match self.ensure_comments().await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!("comments unavailable: {}", err);
                None
            }
        }
    }

    pub async fn ensure_xml_links(&self) -> Result<Arc<XmlUsagePayload>, LoadError> {
        self.xml_links
            .get_or_load(|| fetch_json(&self.source, &self.config.data.xml_links_file))
            .await
    }

    /// Entries for one XML tag group, exact-key lookup only.
    pub async fn xml_usages(&self, tag_group: &str) -> Vec<XmlUsageEntry> {
        match self.ensure_xml_links().await {
            Ok(payload) => payload.tag_groups.get(tag_group).cloned().unwrap_or_default(),
            Err(err) => {
                warn!("xml usage links unavailable: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn xml_tag_groups(&self) -> Vec<String> {
        match self.ensure_xml_links().await {
            Ok(payload) => {
                let mut groups: Vec<String> = payload.tag_groups.keys().cloned().collect();
                groups.sort();
                groups
            }
            Err(err) => {
                warn!("xml usage links unavailable: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn ensure_translations(&self) -> Result<Arc<TranslationPayload>, LoadError> {
        self.translations
            .get_or_load(|| fetch_json(&self.source, &self.config.data.translation_links_file))
            .await
    }

    /// Usages of one translation key, exact-key lookup only.
    pub async fn translation_usages(&self, key: &str) -> Vec<TranslationEntry> {
        match self.ensure_translations().await {
            Ok(payload) => payload
                .translation_links
                .get(key)
                .cloned()
                .unwrap_or_default(),
            Err(err) => {
                warn!("translation links unavailable: {}", err);
                Vec::new()
            }
        }
    }
}
