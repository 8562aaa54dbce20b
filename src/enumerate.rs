//! Prefix enumeration
//!
//! Lists every key under a storage prefix by following continuation tokens
//! until the service reports the last page.

use crate::error::{CopyError, Result};
use crate::path::StorageUri;
use crate::storage::ObjectStore;

/// Lists all keys under a prefix through an [`ObjectStore`]
pub struct ObjectEnumerator<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> ObjectEnumerator<'a, S> {
    /// Create an enumerator over `store`
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List every key under `uri`, in the order the service returns them
    ///
    /// Keys are neither sorted nor deduplicated. Each call lists from
    /// scratch; the continuation token never leaves this function.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::List`] if any page request fails. Keys from
    /// earlier pages are discarded in that case.
    pub fn list_all(&self, uri: &StorageUri) -> Result<ObjectKeys> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let page = self
                .store
                .list_objects_page(uri.container(), uri.key(), continuation.as_deref())
                .map_err(|source| CopyError::List {
                    uri: uri.to_string(),
                    source,
                })?;
            pages += 1;

            tracing::debug!(
                backend = self.store.name(),
                page = pages,
                keys = page.keys.len(),
                more = page.next_token.is_some(),
                "listed page of {}",
                uri
            );

            keys.extend(page.keys);
            continuation = page.next_token;
            if continuation.is_none() {
                break;
            }
        }

        tracing::debug!(total = keys.len(), pages, "finished listing {}", uri);
        Ok(ObjectKeys {
            inner: keys.into_iter(),
        })
    }
}

/// Keys produced by one [`ObjectEnumerator::list_all`] call
///
/// Finite and consumed once; list again for a fresh sequence.
#[derive(Debug)]
pub struct ObjectKeys {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for ObjectKeys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ObjectKeys {}
