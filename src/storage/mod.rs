//! Object storage backends
//!
//! The copier only needs two calls from a storage service: list one page of
//! keys under a prefix, and fetch one object's bytes. [`ObjectStore`] is that
//! seam; [`MemoryStore`] and (with the `s3` feature) [`S3Store`] implement it.

pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

use std::error::Error as StdError;

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Keys on this page, in service order
    pub keys: Vec<String>,
    /// Continuation token for the next page; `None` on the last page
    pub next_token: Option<String>,
}

/// Failure reported by a storage backend
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StoreError {
    /// Create an error from a message alone
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Blocking access to an object storage service
///
/// Implementations perform any transport-level retries themselves; callers
/// treat every returned error as final.
pub trait ObjectStore {
    /// List one page of keys under `prefix` in `container`
    ///
    /// `continuation` is the token returned by the previous page, or `None`
    /// for the first call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the service rejects or fails the request.
    fn list_objects_page(
        &self,
        container: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError>;

    /// Fetch the full contents of one object
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the object is missing or the transfer fails.
    fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Backend name for log messages
    fn name(&self) -> &'static str;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn list_objects_page(
        &self,
        container: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        (**self).list_objects_page(container, prefix, continuation)
    }

    fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get_object(container, key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
