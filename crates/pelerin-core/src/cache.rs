//! Read-through cache for CMS lookups.
//!
//! Every read the site performs against `cms_content` is one [`CmsView`]:
//! a single key or a prefix listing. Writes never clear the whole cache;
//! [`CmsView::invalidated_by`] names exactly which cached views a write to
//! a key makes stale, and only those are dropped.
//!
//! Fills are guarded by a write generation. A reader takes
//! [`CmsCache::generation`] before querying the database and hands it back
//! when storing; if a write invalidated anything in between, the fill is
//! dropped instead of caching a value read before the write.

use std::collections::HashMap;

use log::debug;
use tokio::sync::RwLock;

use crate::models::CmsEntry;

/// One cacheable CMS read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CmsView {
    /// Lookup of a single key; caches misses too
    Entry(String),
    /// Listing of keys starting with the prefix; `None` lists everything
    List(Option<String>),
}

impl CmsView {
    /// Whether a set or delete of `key` changes what this view returns.
    pub fn invalidated_by(&self, key: &str) -> bool {
        match self {
            CmsView::Entry(cached) => cached == key,
            CmsView::List(None) => true,
            CmsView::List(Some(prefix)) => key.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Entry(Option<CmsEntry>),
    List(Vec<CmsEntry>),
}

#[derive(Debug, Default)]
struct Views {
    cached: HashMap<CmsView, Cached>,
    /// Bumped by every write
    generation: u64,
}

impl Views {
    fn fill(&mut self, seen: u64, view: CmsView, value: Cached) -> bool {
        if seen != self.generation {
            debug!("Skipping stale fill of {view:?}");
            return false;
        }
        self.cached.insert(view, value);
        true
    }
}

/// Shared CMS view cache.
#[derive(Debug, Default)]
pub struct CmsCache {
    views: RwLock<Views>,
}

impl CmsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current write generation, to be passed to the `store_*` call that
    /// follows a database read.
    pub async fn generation(&self) -> u64 {
        self.views.read().await.generation
    }

    /// Cached lookup of `key`. The outer `None` is a cache miss; the inner
    /// one a key known to be absent.
    pub async fn entry(&self, key: &str) -> Option<Option<CmsEntry>> {
        let views = self.views.read().await;
        match views.cached.get(&CmsView::Entry(key.to_string())) {
            Some(Cached::Entry(entry)) => Some(entry.clone()),
            _ => None,
        }
    }

    /// Caches a lookup read at generation `seen`. Returns false when a
    /// write happened since and nothing was stored.
    pub async fn store_entry(&self, key: &str, entry: Option<CmsEntry>, seen: u64) -> bool {
        self.views.write().await.fill(
            seen,
            CmsView::Entry(key.to_string()),
            Cached::Entry(entry),
        )
    }

    pub async fn list(&self, prefix: Option<&str>) -> Option<Vec<CmsEntry>> {
        let views = self.views.read().await;
        match views.cached.get(&CmsView::List(prefix.map(str::to_string))) {
            Some(Cached::List(entries)) => Some(entries.clone()),
            _ => None,
        }
    }

    pub async fn store_list(&self, prefix: Option<&str>, entries: Vec<CmsEntry>, seen: u64) -> bool {
        self.views.write().await.fill(
            seen,
            CmsView::List(prefix.map(str::to_string)),
            Cached::List(entries),
        )
    }

    /// Drops every view a write to `key` invalidates and returns them.
    pub async fn invalidate(&self, key: &str) -> Vec<CmsView> {
        let mut views = self.views.write().await;
        views.generation += 1;
        let stale: Vec<CmsView> = views
            .cached
            .keys()
            .filter(|view| view.invalidated_by(key))
            .cloned()
            .collect();
        for view in &stale {
            views.cached.remove(view);
        }
        if !stale.is_empty() {
            debug!("CMS write to '{key}' invalidated {} cached views", stale.len());
        }
        stale
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.cached.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.views.read().await.cached.is_empty()
    }
}
