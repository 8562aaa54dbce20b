//! Path handling for bucket copies
//!
//! - [`clean`]: separator and dot normalization for local paths and URIs
//! - [`SafetyGuard`]: refuses destinations inside protected directories
//! - [`StorageUri`] and [`join`]: parse storage references and rebuild paths

pub mod clean;
pub mod guard;
pub mod resolve;

pub use clean::clean;
pub use guard::{resolve_absolute, ProtectedDirectories, SafetyGuard, DEFAULT_PROTECTED_DIRECTORIES};
pub use resolve::{join, StorageUri, DEFAULT_SCHEME};
