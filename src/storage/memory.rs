//! In-memory object store
//!
//! Holds containers as sorted maps and serves listings in pages of a fixed
//! size, the way a real service returns keys in lexicographic order with a
//! continuation token. Every call is counted so callers can assert which
//! requests were made.

use super::{ListPage, ObjectStore, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Keys returned per page unless overridden
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Object store backed by process memory
#[derive(Debug)]
pub struct MemoryStore {
    containers: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    page_size: usize,
    failing_objects: BTreeSet<(String, String)>,
    failing_listings: BTreeSet<String>,
    list_calls: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            containers: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            failing_objects: BTreeSet::new(),
            failing_listings: BTreeSet::new(),
            list_calls: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Serve at most `page_size` keys per listing call (minimum 1)
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Add or replace an object
    #[must_use]
    pub fn with_object(
        mut self,
        container: &str,
        key: &str,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(container, key, contents);
        self
    }

    /// Make every fetch of `key` fail
    #[must_use]
    pub fn with_failing_object(mut self, container: &str, key: &str) -> Self {
        self.failing_objects
            .insert((container.to_string(), key.to_string()));
        self
    }

    /// Make every listing of `container` fail
    #[must_use]
    pub fn with_failing_listing(mut self, container: &str) -> Self {
        self.failing_listings.insert(container.to_string());
        self
    }

    /// Add or replace an object in place
    pub fn insert(&mut self, container: &str, key: &str, contents: impl Into<Vec<u8>>) {
        self.containers
            .entry(container.to_string())
            .or_default()
            .insert(key.to_string(), contents.into());
    }

    /// Number of listing calls served so far
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Keys requested through [`ObjectStore::get_object`], in call order
    #[must_use]
    pub fn fetched_keys(&self) -> Vec<String> {
        self.fetched
            .lock()
            .map(|fetched| fetched.clone())
            .unwrap_or_default()
    }

    fn record_fetch(&self, key: &str) {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(key.to_string());
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryStore {
    fn list_objects_page(
        &self,
        container: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        if self.failing_listings.contains(container) {
            return Err(StoreError::new(format!(
                "listing failed for container {container}"
            )));
        }
        let objects = self
            .containers
            .get(container)
            .ok_or_else(|| StoreError::new(format!("no such container: {container}")))?;

        let offset = match continuation {
            Some(token) => token
                .parse::<usize>()
                .map_err(|e| StoreError::with_source(format!("invalid continuation token {token:?}"), e))?,
            None => 0,
        };

        let keys: Vec<String> = objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .skip(offset)
            .take(self.page_size + 1)
            .cloned()
            .collect();

        let mut page = ListPage {
            keys,
            next_token: None,
        };
        if page.keys.len() > self.page_size {
            page.keys.truncate(self.page_size);
            page.next_token = Some((offset + self.page_size).to_string());
        }
        Ok(page)
    }

    fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.record_fetch(key);

        if self
            .failing_objects
            .contains(&(container.to_string(), key.to_string()))
        {
            return Err(StoreError::new(format!("fetch failed for {container}/{key}")));
        }
        self.containers
            .get(container)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| StoreError::new(format!("no such key: {container}/{key}")))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
