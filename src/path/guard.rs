//! Destination safety checks
//!
//! Downloaded objects must never land inside system directories. The guard
//! resolves a candidate to its absolute lexical form and compares it against
//! a fixed, ordered set of protected directories, component by component.

use crate::error::{CopyError, Result};
use std::path::{Component, Path, PathBuf};

/// Directories no download may be written into
pub const DEFAULT_PROTECTED_DIRECTORIES: &[&str] = &[
    "/usr/bin",
    "/usr/etc",
    "/usr/lib",
    "/usr/lib64",
    "/usr/libexec",
    "/usr/sbin",
    "/bin",
    "/sbin",
    "/boot",
    "/etc",
    "/lib",
    "/lib64",
    "/selinux",
    "/sys",
];

/// Ordered set of absolute directory prefixes that are off limits
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedDirectories {
    dirs: Vec<PathBuf>,
}

impl ProtectedDirectories {
    /// Build a set from explicit directories, keeping their order
    ///
    /// Relative entries are resolved against the current directory; duplicates
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Resolve`] if an entry has no absolute form.
    pub fn new<I, P>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self { dirs: Vec::new() };
        set.extend(dirs)?;
        Ok(set)
    }

    /// Append more directories after the existing entries
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Resolve`] if an entry has no absolute form.
    pub fn extend<I, P>(&mut self, dirs: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for dir in dirs {
            let resolved = resolve_absolute(dir.as_ref())?;
            if !self.dirs.contains(&resolved) {
                self.dirs.push(resolved);
            }
        }
        Ok(())
    }

    /// Iterate the protected directories in order
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    /// First protected directory containing `path`, if any
    ///
    /// `path` must already be absolute and normalized.
    #[must_use]
    pub fn containing(&self, path: &Path) -> Option<&Path> {
        self.iter().find(|dir| path.starts_with(dir))
    }
}

impl Default for ProtectedDirectories {
    fn default() -> Self {
        Self {
            dirs: DEFAULT_PROTECTED_DIRECTORIES
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

/// Rejects destinations that resolve into a protected directory
#[derive(Debug, Clone, Default)]
pub struct SafetyGuard {
    protected: ProtectedDirectories,
}

impl SafetyGuard {
    /// Create a guard over the given protected set
    #[must_use]
    pub const fn new(protected: ProtectedDirectories) -> Self {
        Self { protected }
    }

    /// The protected set this guard enforces
    #[must_use]
    pub const fn protected(&self) -> &ProtectedDirectories {
        &self.protected
    }

    /// Check that `path` may be written
    ///
    /// The path is made absolute and `.`/`..` are resolved lexically; the
    /// filesystem is not consulted. Matching is per component, so `/etcetera`
    /// is not inside `/etc`.
    ///
    /// # Errors
    ///
    /// - [`CopyError::UnsafePath`] if the resolved path is a protected
    ///   directory or lies beneath one
    /// - [`CopyError::Resolve`] if no absolute form can be computed
    pub fn check_safe(&self, path: &Path) -> Result<()> {
        let resolved = resolve_absolute(path)?;
        match self.protected.containing(&resolved) {
            Some(protected) => Err(CopyError::UnsafePath {
                protected: protected.to_path_buf(),
                path: resolved,
            }),
            None => Ok(()),
        }
    }
}

/// Absolute, lexically normalized form of `path`
///
/// Relative paths are joined onto the current directory. `.` components are
/// dropped and `..` pops the previous component, never past the root.
/// Symlinks are not followed and nothing needs to exist.
///
/// # Errors
///
/// Returns [`CopyError::Resolve`] for an empty path or when the current
/// directory cannot be determined.
pub fn resolve_absolute(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|source| CopyError::Resolve {
        path: path.to_path_buf(),
        source,
    })?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    Ok(normalized)
}
