//! Per-run memoization of catalog searches.
//!
//! Keys are the raw query titles, compared exactly: `"taboo"` and `"Taboo"`
//! are separate entries. Entries are never evicted or invalidated.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use mediamap_core::{Movie, Show};
use tracing::debug;

use crate::provider::CatalogProvider;

pub struct LookupCache<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V: Clone> LookupCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn put(&self, key: &str, value: V) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for LookupCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a provider so each distinct title is searched upstream once.
///
/// Empty results are cached too; a failed search is not retried.
pub struct CachedProvider<P> {
    inner: P,
    movies: LookupCache<Vec<Movie>>,
    shows: LookupCache<Vec<Show>>,
}

impl<P: CatalogProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            movies: LookupCache::new(),
            shows: LookupCache::new(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<P: CatalogProvider> CatalogProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search_movies(&self, title: &str) -> Vec<Movie> {
        if let Some(hit) = self.movies.get(title) {
            debug!(title, "movie search cache hit");
            return hit;
        }
        let results = self.inner.search_movies(title).await;
        self.movies.put(title, results.clone());
        results
    }

    async fn search_shows(&self, title: &str) -> Vec<Show> {
        if let Some(hit) = self.shows.get(title) {
            debug!(title, "show search cache hit");
            return hit;
        }
        let results = self.inner.search_shows(title).await;
        self.shows.put(title, results.clone());
        results
    }
}
