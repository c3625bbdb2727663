//! Discovery of the files a run will visit.

use crate::config::Target;
use crate::safety::RootGuard;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything found under the configured subdirectories.
#[derive(Debug, Default, Clone)]
pub struct Discovery {
    /// Canonical paths of files to rewrite, in walk order
    pub files: Vec<PathBuf>,
    /// Configured subdirectories that do not exist
    pub missing: Vec<PathBuf>,
    /// Matching files the root guard refused
    pub skipped: Vec<(PathBuf, String)>,
    /// Entries the walk itself could not read
    pub errors: Vec<(PathBuf, String)>,
}

/// Walk every configured subdirectory of the guard's root.
///
/// Entries are visited sorted by file name so runs are reproducible.
/// Symlinked files are followed only when they resolve inside the root;
/// a file reachable through several links is listed once.
pub fn discover(target: &Target, guard: &RootGuard) -> Discovery {
    let extension = target.extension();
    let mut discovery = Discovery::default();
    let mut seen = HashSet::new();

    for dir in &target.directories {
        let dir_path = guard.root().join(dir);
        if !dir_path.is_dir() {
            discovery.missing.push(dir_path);
            continue;
        }

        for entry in WalkDir::new(&dir_path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&dir_path).to_path_buf();
                    discovery.errors.push((path, e.to_string()));
                    continue;
                }
            };

            let path = entry.path();
            if !has_extension(path, extension) {
                continue;
            }

            let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
            if !is_file {
                continue;
            }

            match guard.validate_path(path) {
                Ok(canonical) => {
                    if seen.insert(canonical.clone()) {
                        discovery.files.push(canonical);
                    }
                }
                Err(e) => discovery.skipped.push((path.to_path_buf(), e.to_string())),
            }
        }
    }

    discovery
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(extension)
}
