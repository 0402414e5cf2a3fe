use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    document::Document,
    error::GeoViewError,
    source::{Resolve, SourceConfig},
};

/// Memoizes the documents returned by an inner [`Resolve`] implementation,
/// keyed by [`SourceConfig::cache_key`].
///
/// Entries live until they are older than the configured time-to-live (if
/// any) or are invalidated manually. Errors are never cached.
pub struct CachedResolver<R> {
    inner: R,
    ttl: Option<Duration>,
    entries: RwLock<FxHashMap<String, Entry>>,
}

struct Entry {
    document: Document,
    created: Instant,
}

impl<R: Resolve> CachedResolver<R> {
    /// Wraps `inner`. Entries never expire.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            ttl: None,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Wraps `inner`. Entries expire after `ttl`.
    pub fn with_ttl(inner: R, ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new(inner)
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drops the cached document for `config`, if any
    pub fn invalidate(&self, config: &SourceConfig) {
        self.entries.write().remove(&config.cache_key());
    }

    /// Drops all cached documents
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.ttl.map_or(true, |ttl| entry.created.elapsed() < ttl)
    }
}

impl<R: Resolve> Resolve for CachedResolver<R> {
    fn resolve(&self, config: &SourceConfig) -> Result<Document, GeoViewError> {
        let key = config.cache_key();

        if let Some(entry) = self.entries.read().get(&key) {
            if self.is_fresh(entry) {
                debug!(key = %key, "cache hit");
                return Ok(entry.document.clone());
            }
        }

        let document = self.inner.resolve(config)?;
        self.entries.write().insert(
            key,
            Entry {
                document: document.clone(),
                created: Instant::now(),
            },
        );
        Ok(document)
    }
}
