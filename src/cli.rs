use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "githerd")]
#[command(about = "Apply one git command across every repository in a folder")]
pub struct Cli {
    /// Path to the settings file (overrides the default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run `git fetch` in every repository
    Fetch,
    /// Run `git push` in every repository
    Push,
    /// Run `git pull` in every repository
    Pull,
    /// Switch every repository to a branch, offering to create it where absent
    Switch {
        /// Name of the branch to switch to
        branch: String,
    },
    /// Persist the folder whose subdirectories are the repositories
    SetFolder {
        /// Folder containing the repositories
        path: PathBuf,
    },
}
