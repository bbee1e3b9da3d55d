use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::catalog::records::TypeRecord;
use crate::config::SearchConfig;

/// Which field family produced the match. Defaults to `Name`; later, more
/// specific checks overwrite it, so the last matching rule in evaluation
/// order wins even when an earlier rule contributed more weight. That is the
/// shipped behavior and it is replicated deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Name,
    File,
    Signature,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub record: TypeRecord,
    pub match_kind: MatchKind,
    pub relevance: i32,
}

/// Scored substring search over the raw type list, with a per-session query
/// cache. The cache is append-only and unbounded; it must be `reset()`
/// whenever a new corpus is loaded, since cached results hold records from
/// the corpus they were computed against.
///
/// The engine never aborts an in-flight scan; a caller that issues a new
/// query before a previous one resolves is expected to drop the stale
/// results at the consumption boundary.
pub struct SearchEngine {
    config: SearchConfig,
    cache: DashMap<String, Arc<Vec<SearchResult>>>,
    scans: AtomicUsize,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cache: DashMap::new(),
            scans: AtomicUsize::new(0),
        }
    }

    /// Rank `corpus` against `query`. Large corpora are scanned in batches
    /// with a cooperative yield between them; results are identical to a
    /// single synchronous pass.
    pub async fn search(&self, query: &str, corpus: &[TypeRecord]) -> Arc<Vec<SearchResult>> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return Arc::new(Vec::new());
        }
        if let Some(cached) = self.cache.get(&normalized) {
            return cached.clone();
        }

        let mut scored = Vec::new();
        if corpus.len() >= self.config.async_threshold {
            for batch in corpus.chunks(self.config.batch_size.max(1)) {
                self.scan_batch(batch, &normalized, &mut scored);
                tokio::task::yield_now().await;
            }
        } else {
            self.scan_batch(corpus, &normalized, &mut scored);
        }
        self.scans.fetch_add(1, Ordering::Relaxed);

        // Stable sort keeps corpus scan order for ties.
        scored.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        scored.truncate(self.config.result_limit);

        let results = Arc::new(scored);
        self.cache.insert(normalized, results.clone());
        results
    }

    /// Synchronous convenience wrapper over `search`.
    pub fn search_blocking(&self, query: &str, corpus: &[TypeRecord]) -> Arc<Vec<SearchResult>> {
        futures::executor::block_on(self.search(query, corpus))
    }

    fn scan_batch(&self, batch: &[TypeRecord], query: &str, out: &mut Vec<SearchResult>) {
        for record in batch {
            if let Some(result) = score_type(record, query) {
                out.push(result);
            }
        }
    }

    /// Drop all cached results. Required after a corpus reload.
    pub fn reset(&self) {
        self.cache.clear();
    }

    /// Number of full corpus scans performed (cache hits excluded).
    pub fn scans_performed(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Signature checks are bounded to the first members for cost; the cheaper
/// member checks run over the whole list.
const SIGNATURE_SCAN_LIMIT: usize = 10;

fn score_type(record: &TypeRecord, query: &str) -> Option<SearchResult> {
    let mut relevance = 0;
    let mut match_kind = MatchKind::Name;

    let name = record.name.to_lowercase();
    if name.contains(query) {
        relevance += 10;
        if name.starts_with(query) {
            relevance += 5;
        }
        // Exact names must rank strictly above prefix matches like
        // "Pawn" vs "PawnGroup", which the prefix bonus alone cannot order.
        if name == query {
            relevance += 5;
        }
    }

    if record.file.to_lowercase().contains(query) {
        relevance += 3;
        match_kind = MatchKind::File;
    }

    if record.access_modifier.to_lowercase().contains(query) {
        relevance += 3;
    }
    if record
        .modifiers
        .iter()
        .any(|m| m.to_lowercase().contains(query))
    {
        relevance += 3;
    }

    for member in record.members.iter().take(SIGNATURE_SCAN_LIMIT) {
        if member.signature.to_lowercase().contains(query) {
            relevance += 2;
            match_kind = MatchKind::Signature;
        }
    }
    for member in &record.members {
        if member.name.to_lowercase().contains(query) {
            relevance += 3;
            match_kind = MatchKind::Signature;
        }
    }
    for member in &record.members {
        if let Some(return_type) = &member.return_type {
            if return_type.to_lowercase().contains(query) {
                relevance += 2;
                match_kind = MatchKind::Signature;
            }
        }
    }
    for member in &record.members {
        if member.access_modifier.to_lowercase().contains(query) {
            relevance += 2;
            match_kind = MatchKind::Signature;
        }
    }

    if relevance == 0 {
        return None;
    }
    Some(SearchResult {
        record: record.clone(),
        match_kind,
        relevance,
    })
}
