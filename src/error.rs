use std::path::PathBuf;
use thiserror::Error;

use crate::git::GitError;

/// Application errors, worded as the messages the user sees.
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "No folder path containing the repositories provided. Please use the 'set-folder' command to set it."
    )]
    ConfigurationMissing,

    #[error("No git repositories found in the provided folder ({}).", folder.display())]
    EmptyRepositorySet { folder: PathBuf },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("failed to read confirmation: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("{failed} of {total} repositories failed")]
    BatchFailed { failed: usize, total: usize },
}

impl Error {
    /// Process exit code for this error: configuration problems exit 2,
    /// everything else exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigurationMissing | Error::EmptyRepositorySet { .. } => 2,
            _ => 1,
        }
    }
}
