//! Storage URI parsing and path reconstruction

use super::clean;
use crate::error::{CopyError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Scheme used when building URIs for the S3 backend
pub const DEFAULT_SCHEME: &str = "s3";

/// `scheme://container/key`, where the container holds no separator
static STORAGE_URI: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Literal pattern
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://([^/]+)/(.*)$")
        .expect("storage URI pattern must compile")
});

/// A parsed storage reference: the container (bucket) and the key within it
///
/// The key may contain separators and may be empty (the whole container).
/// Values are immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageUri {
    scheme: String,
    container: String,
    key: String,
}

impl StorageUri {
    /// Parse `scheme://container/key`
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Parse`] when the input does not have that shape,
    /// including a missing `/` after the container.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketcp::path::StorageUri;
    ///
    /// let uri = StorageUri::parse("s3://bucket/a/b/c.txt")?;
    /// assert_eq!(uri.container(), "bucket");
    /// assert_eq!(uri.key(), "a/b/c.txt");
    /// # Ok::<(), bucketcp::CopyError>(())
    /// ```
    pub fn parse(uri: &str) -> Result<Self> {
        let captures = STORAGE_URI.captures(uri).ok_or_else(|| CopyError::Parse {
            uri: uri.to_string(),
        })?;
        Ok(Self {
            scheme: captures[1].to_string(),
            container: captures[2].to_string(),
            key: captures[3].to_string(),
        })
    }

    /// Reference to `key` in the same container and scheme
    #[must_use]
    pub fn with_key(&self, key: &str) -> Self {
        Self {
            scheme: self.scheme.clone(),
            container: self.container.clone(),
            key: key.to_string(),
        }
    }

    /// URI scheme, e.g. `s3`
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Container (bucket) name
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Object key or key prefix
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.container, self.key)
    }
}

/// Join a base path and an object key with exactly one separator
///
/// The result is passed through [`clean`], so a trailing `/` on the base or a
/// leading `/` on the key never produces `//`.
///
/// # Examples
///
/// ```
/// use bucketcp::path::join;
///
/// assert_eq!(join("/tmp/out/", "logs/1.log"), "/tmp/out/logs/1.log");
/// assert_eq!(join("/tmp/out", "logs/1.log"), "/tmp/out/logs/1.log");
/// ```
#[must_use]
pub fn join(base: &str, key: &str) -> String {
    clean(&format!("{base}/{key}"))
}
