use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A git working tree found directly under the repositories folder.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Whether `path` looks like a git repository: a `.git` entry exists, file or
/// directory. The entry is not validated any further.
pub fn is_git_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Finds git repositories among the immediate children of `folder`.
///
/// Only direct subdirectories are considered; the walk never descends into
/// them. Results follow the underlying directory-listing order, which is not
/// sorted and not guaranteed stable across platforms.
pub fn find_repos<P: AsRef<Path>>(folder: P) -> Result<Vec<Repository>> {
    let folder = folder.as_ref();
    let mut repositories = Vec::new();

    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_dir() || !is_git_repo(entry.path()) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        debug!(repo = %name, "discovered repository");
        repositories.push(Repository { name, path });
    }

    Ok(repositories)
}
