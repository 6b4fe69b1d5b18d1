use console::style;
use tracing::warn;

use crate::error::Error;
use crate::git::{BatchOp, Git};
use crate::scan::Repository;

/// How one repository came out of a branch-switch pass.
#[derive(Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    Created,
    Skipped,
}

/// Applies `op` to each repository in sequence, printing a header and the
/// captured git output per repository.
///
/// A failing repository does not stop the batch: the failure is reported,
/// recorded, and the remaining repositories still run. When anything failed
/// the batch as a whole is an error.
pub fn run_batch(git: &dyn Git, repos: &[Repository], op: BatchOp) -> Result<(), Error> {
    let mut failures = Vec::new();

    for repo in repos {
        print_header(repo);
        match git.run(op, &repo.path) {
            Ok(output) => {
                let output = output.trim_end();
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(err) => {
                warn!(repo = %repo.name, error = %err, "batch operation failed");
                println!("{}", style(format!("{op} failed: {err}")).red());
                failures.push(repo.name.clone());
            }
        }
    }

    finish(failures, repos.len())
}

/// Switches every repository to `branch`. Where the branch does not exist,
/// `confirm_create` is asked; on a yes the branch is created at the current
/// HEAD, on a no the repository is skipped and the batch moves on.
pub fn switch_branches(
    git: &dyn Git,
    repos: &[Repository],
    branch: &str,
    mut confirm_create: impl FnMut(&Repository) -> std::io::Result<bool>,
) -> Result<(), Error> {
    let mut failures = Vec::new();

    for repo in repos {
        print_header(repo);
        match switch_one(git, repo, branch, &mut confirm_create) {
            Ok(SwitchOutcome::Switched) => {
                println!("{}", style(format!("Switched to branch {branch}")).green());
            }
            Ok(SwitchOutcome::Created) => {
                println!("{}", style(format!("Branch {branch} created!")).green());
            }
            Ok(SwitchOutcome::Skipped) => {
                println!("Skipped.");
            }
            Err(err) => {
                warn!(repo = %repo.name, error = %err, "branch switch failed");
                println!("{}", style(format!("switch failed: {err}")).red());
                failures.push(repo.name.clone());
            }
        }
    }

    finish(failures, repos.len())
}

fn switch_one(
    git: &dyn Git,
    repo: &Repository,
    branch: &str,
    confirm_create: &mut impl FnMut(&Repository) -> std::io::Result<bool>,
) -> Result<SwitchOutcome, Error> {
    let branches = git.branches(&repo.path)?;

    if branches.iter().any(|name| name == branch) {
        git.switch(&repo.path, branch)?;
        return Ok(SwitchOutcome::Switched);
    }

    if confirm_create(repo)? {
        git.create_branch(&repo.path, branch)?;
        Ok(SwitchOutcome::Created)
    } else {
        Ok(SwitchOutcome::Skipped)
    }
}

fn print_header(repo: &Repository) {
    println!("\n-- {} --\n", style(repo.path.display()).bold());
}

fn finish(failures: Vec<String>, total: usize) -> Result<(), Error> {
    if failures.is_empty() {
        return Ok(());
    }

    println!();
    for name in &failures {
        println!("{}", style(format!("  failed: {name}")).red());
    }

    Err(Error::BatchFailed {
        failed: failures.len(),
        total,
    })
}
