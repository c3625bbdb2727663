use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root-boundary checks so a rewrite never lands outside the target tree.
#[derive(Debug, Clone)]
pub struct RootGuard {
    /// Canonical path to the root directory
    root: PathBuf,
    /// Canonical paths to excluded directories under the root
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside root: {path} (root: {root})")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Path is in excluded directory: {path} (excluded: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl RootGuard {
    /// Create a guard for `root`, excluding the named subdirectories.
    ///
    /// The root is canonicalized to handle symlinks correctly. Excluded
    /// directories that do not exist are ignored.
    pub fn new(root: impl AsRef<Path>, exclude: &[String]) -> Result<Self, SafetyError> {
        let root = root.as_ref().canonicalize()?;

        let forbidden_paths = exclude
            .iter()
            .filter(|name| !name.trim().is_empty())
            .filter_map(|name| root.join(name).canonicalize().ok())
            .collect();

        Ok(Self {
            root,
            forbidden_paths,
        })
    }

    /// Check if a path is safe to rewrite.
    ///
    /// Returns the canonicalized absolute path if safe.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        // Resolves symlinks and .. components
        let canonical = absolute.canonicalize()?;

        if !canonical.starts_with(&self.root) {
            return Err(SafetyError::OutsideRoot {
                path: canonical,
                root: self.root.clone(),
            });
        }

        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ForbiddenPath {
                    path: canonical,
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(canonical)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
