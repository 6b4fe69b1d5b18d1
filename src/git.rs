use git2::{BranchType, Repository as GitRepository};
use std::fmt;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Errors from the underlying git mechanism.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute git: {0}")]
    Spawn(#[from] std::io::Error),

    /// A git command exited with a non-zero status.
    #[error("git {command} failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// The repository could not be read for branch inspection.
    #[error("failed to inspect repository: {0}")]
    Inspect(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;

/// A batch-applicable git porcelain command. Each variant maps 1:1 to the
/// identically named git command, with no extra arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOp {
    Fetch,
    Push,
    Pull,
}

impl BatchOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchOp::Fetch => "fetch",
            BatchOp::Push => "push",
            BatchOp::Pull => "pull",
        }
    }
}

impl fmt::Display for BatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for git operations, one method per command.
pub trait Git {
    /// Run `git fetch`, returning captured stdout.
    fn fetch(&self, repo: &Path) -> Result<String>;

    /// Run `git push`, returning captured stdout.
    fn push(&self, repo: &Path) -> Result<String>;

    /// Run `git pull`, returning captured stdout.
    fn pull(&self, repo: &Path) -> Result<String>;

    /// Branch names visible in the repository, local and remote-tracking.
    fn branches(&self, repo: &Path) -> Result<Vec<String>>;

    /// Check out an existing branch.
    fn switch(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Create `branch` at the current HEAD and switch to it.
    fn create_branch(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Dispatch a batch operation to the matching method.
    fn run(&self, op: BatchOp, repo: &Path) -> Result<String> {
        match op {
            BatchOp::Fetch => self.fetch(repo),
            BatchOp::Push => self.push(repo),
            BatchOp::Pull => self.pull(repo),
        }
    }
}

/// Production implementation: porcelain commands shell out to the `git`
/// binary (authentication and network behavior stay git's problem), branch
/// inspection goes through libgit2.
pub struct GitCli;

impl Git for GitCli {
    fn fetch(&self, repo: &Path) -> Result<String> {
        git_command(&["fetch"], repo)
    }

    fn push(&self, repo: &Path) -> Result<String> {
        git_command(&["push"], repo)
    }

    fn pull(&self, repo: &Path) -> Result<String> {
        git_command(&["pull"], repo)
    }

    fn branches(&self, repo: &Path) -> Result<Vec<String>> {
        let git_repo = GitRepository::open(repo)?;
        let mut names = Vec::new();

        for entry in git_repo.branches(None)? {
            let (branch, branch_type) = entry?;
            let Some(name) = branch.name()? else { continue };
            push_unique(&mut names, name.to_string());

            // `origin/dev` also answers to plain `dev`, so a branch that
            // exists only on a remote still matches by name and `git switch`
            // resolves it as a tracking checkout.
            if branch_type == BranchType::Remote {
                if let Some((_, short)) = name.split_once('/') {
                    if short != "HEAD" {
                        push_unique(&mut names, short.to_string());
                    }
                }
            }
        }

        Ok(names)
    }

    fn switch(&self, repo: &Path, branch: &str) -> Result<()> {
        git_command(&["switch", branch], repo).map(|_| ())
    }

    fn create_branch(&self, repo: &Path, branch: &str) -> Result<()> {
        git_command(&["checkout", "-b", branch], repo).map(|_| ())
    }
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}

/// Execute `git` with the given arguments in `cwd`, capturing stdout.
fn git_command(args: &[&str], cwd: &Path) -> Result<String> {
    debug!(?args, cwd = %cwd.display(), "running git");
    let output = Command::new("git").args(args).current_dir(cwd).output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
