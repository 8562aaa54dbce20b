//! Error types for bucket copy operations
//!
//! Every failure aborts the run. The orchestrator is the only place that
//! decides to stop; the components below it return these variants and never
//! recover locally.

use crate::storage::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while copying objects to the local filesystem
#[derive(Debug, Error)]
pub enum CopyError {
    /// The storage URI does not match `scheme://container/key`
    #[error("storage path format error: {uri}")]
    Parse {
        /// The rejected input
        uri: String,
    },

    /// The storage service failed while listing a prefix
    #[error("failed to list objects under {uri}")]
    List {
        /// Prefix being enumerated
        uri: String,
        /// Backend failure
        #[source]
        source: StoreError,
    },

    /// The storage service failed while retrieving an object
    #[error("failed to fetch {uri}")]
    Fetch {
        /// Object being fetched
        uri: String,
        /// Backend failure
        #[source]
        source: StoreError,
    },

    /// The destination resolves under a protected directory
    #[error("unsafe path: {} (inside protected directory {})", path.display(), protected.display())]
    UnsafePath {
        /// Resolved absolute destination
        path: PathBuf,
        /// Protected directory that contains it
        protected: PathBuf,
    },

    /// An absolute form could not be computed for a path
    #[error("cannot resolve an absolute path for {}", path.display())]
    Resolve {
        /// Path as given
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating directories or writing file bytes failed
    #[error("failed to write {}", path.display())]
    Write {
        /// Filesystem path involved
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CopyError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CopyError>;
