//! Directory configuration for storage paths

use std::path::{Path, PathBuf};

/// Per-user directory holding the Lean CLI's persisted state
///
/// Defaults to `~/.lean`. Credentials and general settings live in separate
/// files under it so each gets its own [`Storage`](crate::Storage).
///
/// # Example
///
/// ```
/// use lean_store::LeanDirs;
///
/// let dirs = LeanDirs::at("/tmp/lean-home");
/// assert!(dirs.credentials_path().ends_with("credentials"));
/// ```
#[derive(Clone, Debug)]
pub struct LeanDirs {
    root: PathBuf,
    cache: PathBuf,
}

impl LeanDirs {
    /// Resolve `~/.lean` for the current user
    ///
    /// Falls back to the working directory when no home directory is known.
    pub fn new() -> Self {
        let base = directories::BaseDirs::new();

        let root = base
            .as_ref()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lean");

        let cache = base
            .as_ref()
            .map(|dirs| dirs.cache_dir().join("lean"))
            .unwrap_or_else(|| root.join("cache"));

        Self { root, cache }
    }

    /// Use `root` instead of `~/.lean`
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let cache = root.join("cache");
        Self { root, cache }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the user id and API token
    pub fn credentials_path(&self) -> PathBuf {
        self.root.join("credentials")
    }

    /// File holding general CLI settings
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Scratch directory for downloads
    pub fn cache_dir(&self) -> &Path {
        &self.cache
    }
}

impl Default for LeanDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_are_separate_under_root() {
        let dirs = LeanDirs::at("/home/user/.lean");

        assert_eq!(dirs.credentials_path(), PathBuf::from("/home/user/.lean/credentials"));
        assert_eq!(dirs.config_path(), PathBuf::from("/home/user/.lean/config"));
        assert_ne!(dirs.credentials_path(), dirs.config_path());
        assert!(dirs.cache_dir().starts_with(dirs.root()));
    }
}
