//! Prefix-to-directory copying
//!
//! [`Copier::run`] lists every key under a storage prefix once, then handles
//! each key to completion before starting the next:
//!
//! ```text
//! listed ─┬─ directory marker ──────────────────────────────▶ skipped
//!         └─ resolved ─▶ cleaned ─▶ checked ─▶ fetched ─▶ persisted
//!                                      │           │           │
//!                                      └───────────┴───────────┴──▶ abort run
//! ```
//!
//! The destination is checked against the protected directories before any
//! bytes are fetched. Objects are fetched by their listed key; the cleaned
//! source URI only appears in logs and errors. The first error of any kind ends the run; files written
//! before it are left in place.

use crate::enumerate::ObjectEnumerator;
use crate::error::{CopyError, Result};
use crate::path::{clean, join, resolve_absolute, SafetyGuard, StorageUri};
use crate::stats::CopyStats;
use crate::storage::ObjectStore;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};

/// How object keys map onto the destination directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyLayout {
    /// Write each object at `<base>/<full key>`
    #[default]
    FullKey,
    /// Write each object at `<base>/<key without the source prefix>`
    ///
    /// A key equal to the prefix keeps its last path segment.
    StripPrefix,
}

/// Behavior switches for a [`Copier`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Destination layout
    pub layout: KeyLayout,
    /// Resolve and check every task, but fetch and write nothing
    pub dry_run: bool,
}

/// A single object to copy: where it comes from and where it goes
///
/// Built and consumed within one iteration of the copy loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    /// Key exactly as listed; used to fetch the object
    pub key: String,
    /// Cleaned, fully-qualified source object, for reporting
    pub source: StorageUri,
    /// Cleaned absolute destination file
    pub destination: PathBuf,
}

/// Copies every object under a prefix into a local directory
pub struct Copier<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    guard: &'a SafetyGuard,
    options: CopyOptions,
    progress: ProgressBar,
}

impl<'a, S: ObjectStore + ?Sized> Copier<'a, S> {
    /// Create a copier with default options and no progress display
    pub fn new(store: &'a S, guard: &'a SafetyGuard) -> Self {
        Self {
            store,
            guard,
            options: CopyOptions::default(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Replace the copy options
    #[must_use]
    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Report per-key progress on `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Copy every non-marker object under `source_prefix_uri` into `destination_base`
    ///
    /// A relative `destination_base` is resolved against the current
    /// directory. Existing files at a destination are overwritten.
    ///
    /// # Errors
    ///
    /// Stops at the first failure and returns it:
    /// - [`CopyError::Parse`] for a malformed source URI
    /// - [`CopyError::List`] if the listing fails (nothing is fetched)
    /// - [`CopyError::UnsafePath`] if a destination is protected (checked
    ///   before that object is fetched)
    /// - [`CopyError::Fetch`] if an object cannot be retrieved
    /// - [`CopyError::Write`] if directories or the file cannot be written
    /// - [`CopyError::Resolve`] if the destination base has no absolute form
    pub fn run(&self, source_prefix_uri: &str, destination_base: &str) -> Result<CopyStats> {
        let prefix = StorageUri::parse(source_prefix_uri)?;
        let base = resolve_absolute(Path::new(destination_base))?;
        let base = base.to_string_lossy();

        let keys = ObjectEnumerator::new(self.store).list_all(&prefix)?;
        let mut stats = CopyStats {
            objects_listed: keys.len() as u64,
            ..CopyStats::default()
        };
        self.progress.set_length(stats.objects_listed);

        let result = keys.into_iter().try_for_each(|key| {
            let outcome = self.copy_key(&prefix, &base, &key, &mut stats);
            self.progress.inc(1);
            outcome
        });
        self.progress.finish_and_clear();

        match result {
            Ok(()) => Ok(stats),
            Err(e) => {
                if !self.options.dry_run && stats.files_copied > 0 {
                    tracing::warn!(
                        files_written = stats.files_copied,
                        "aborting; files already written under {} are left in place",
                        base
                    );
                }
                Err(e)
            }
        }
    }

    /// Build the cleaned source and destination for one key
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Parse`] if the cleaned source no longer parses.
    pub fn plan(&self, prefix: &StorageUri, base: &str, key: &str) -> Result<CopyTask> {
        let source = StorageUri::parse(&clean(&prefix.with_key(key).to_string()))?;
        let relative = match self.options.layout {
            KeyLayout::FullKey => key,
            KeyLayout::StripPrefix => relative_key(prefix.key(), key),
        };
        Ok(CopyTask {
            key: key.to_string(),
            source,
            destination: PathBuf::from(join(base, relative)),
        })
    }

    fn copy_key(
        &self,
        prefix: &StorageUri,
        base: &str,
        key: &str,
        stats: &mut CopyStats,
    ) -> Result<()> {
        if is_directory_marker(key) {
            tracing::debug!("skipping directory marker {}", key);
            stats.record_marker();
            return Ok(());
        }

        let task = self.plan(prefix, base, key)?;
        self.guard.check_safe(&task.destination)?;

        tracing::info!(
            source = %task.source,
            destination = %task.destination.display(),
            "save {} to {}",
            task.source,
            task.destination.display()
        );
        self.progress.set_message(key.to_string());

        if self.options.dry_run {
            stats.record_copy(0);
            return Ok(());
        }

        let contents = self
            .store
            .get_object(prefix.container(), &task.key)
            .map_err(|source| CopyError::Fetch {
                uri: task.source.to_string(),
                source,
            })?;
        persist(&task.destination, &contents)?;
        stats.record_copy(contents.len() as u64);
        Ok(())
    }
}

/// Whether `key` is a placeholder for a "directory" rather than file content
#[must_use]
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// `key` relative to `prefix`, falling back to its last segment
fn relative_key<'k>(prefix: &str, key: &'k str) -> &'k str {
    match key.strip_prefix(prefix) {
        Some(rest) if !rest.trim_start_matches('/').is_empty() => rest,
        _ => key.rsplit('/').next().unwrap_or(key),
    }
}

/// Create missing parents and write `contents`, replacing any existing file
fn persist(destination: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::write(parent, e))?;
    }
    fs::write(destination, contents).map_err(|e| CopyError::write(destination, e))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::storage::MemoryStore;
    use rstest::rstest;

    #[rstest]
    #[case("logs/", true)]
    #[case("logs/2017/", true)]
    #[case("logs/1.log", false)]
    #[case("", false)]
    fn test_directory_marker(#[case] key: &str, #[case] marker: bool) {
        assert_eq!(is_directory_marker(key), marker);
    }

    #[rstest]
    #[case("logs/", "logs/2017/2.log", "2017/2.log")]
    #[case("logs", "logs/1.log", "/1.log")]
    #[case("logs/1.log", "logs/1.log", "1.log")]
    #[case("", "a/b", "a/b")]
    #[case("other/", "logs/1.log", "1.log")]
    fn test_relative_key(#[case] prefix: &str, #[case] key: &str, #[case] expected: &str) {
        assert_eq!(relative_key(prefix, key), expected);
    }

    #[test]
    fn test_plan_full_key_layout() {
        let store = MemoryStore::new();
        let guard = SafetyGuard::default();
        let copier = Copier::new(&store, &guard);
        let prefix = StorageUri::parse("s3://public/transact/").unwrap();

        let task = copier
            .plan(&prefix, "/tmp/out/", "transact/logs//2017/2.log")
            .unwrap();
        assert_eq!(task.source.to_string(), "s3://public/transact/logs/2017/2.log");
        assert_eq!(
            task.destination,
            PathBuf::from("/tmp/out/transact/logs/2017/2.log")
        );
    }

    #[test]
    fn test_plan_strip_prefix_layout() {
        let store = MemoryStore::new();
        let guard = SafetyGuard::default();
        let copier = Copier::new(&store, &guard).with_options(CopyOptions {
            layout: KeyLayout::StripPrefix,
            dry_run: false,
        });
        let prefix = StorageUri::parse("s3://public/transact/").unwrap();

        let task = copier
            .plan(&prefix, "/tmp/out", "transact/logs/1.log")
            .unwrap();
        assert_eq!(task.destination, PathBuf::from("/tmp/out/logs/1.log"));
    }

    #[test]
    fn test_plan_neutralises_parent_steps_in_keys() {
        let store = MemoryStore::new();
        let guard = SafetyGuard::default();
        let copier = Copier::new(&store, &guard);
        let prefix = StorageUri::parse("s3://bucket/").unwrap();

        let task = copier.plan(&prefix, "/tmp/out", "../../etc/passwd").unwrap();
        assert_eq!(task.destination, PathBuf::from("/tmp/out/././etc/passwd"));
        assert!(guard.check_safe(&task.destination).is_ok());
    }
}
