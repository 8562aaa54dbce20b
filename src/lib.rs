//! bucketcp - copy an object-storage prefix into a local directory tree
//!
//! Every object under a prefix is listed, mapped to a path under the
//! destination directory, checked against a set of protected system
//! directories, fetched and written. Processing is sequential and the first
//! error aborts the run.
//!
//! ```rust
//! use bucketcp::copy::Copier;
//! use bucketcp::path::SafetyGuard;
//! use bucketcp::storage::MemoryStore;
//!
//! let store = MemoryStore::new()
//!     .with_object("bucket", "logs/1.log", "first")
//!     .with_object("bucket", "logs/2017/", "")
//!     .with_object("bucket", "logs/2017/2.log", "second");
//! let guard = SafetyGuard::default();
//! let out = tempfile::tempdir()?;
//!
//! let stats = Copier::new(&store, &guard)
//!     .run("s3://bucket/logs/", &out.path().to_string_lossy())?;
//! assert_eq!(stats.files_copied, 2);
//! assert!(out.path().join("logs/2017/2.log").is_file());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod copy;
pub mod enumerate;
pub mod error;
pub mod path;
pub mod stats;
pub mod storage;

pub use error::{CopyError, Result};
