use anyhow::Result;
use clap::Parser;
use console::style;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use githerd::app;
use githerd::cli::{Cli, Command};
use githerd::config::{Config, SetOutcome};
use githerd::error::Error;
use githerd::git::{BatchOp, GitCli};
use githerd::scan::{self, Repository};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        println!("{}", style(&err).red());
        let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config)?;

    match cli.command {
        Command::Fetch => run_batch(&config, BatchOp::Fetch),
        Command::Push => run_batch(&config, BatchOp::Push),
        Command::Pull => run_batch(&config, BatchOp::Pull),
        Command::Switch { branch } => switch(&config, &branch),
        Command::SetFolder { path } => set_folder(&mut config, path),
    }
}

fn run_batch(config: &Config, op: BatchOp) -> Result<()> {
    let repos = discover(config)?;
    app::run_batch(&GitCli, &repos, op)?;
    Ok(())
}

fn switch(config: &Config, branch: &str) -> Result<()> {
    let repos = discover(config)?;
    app::switch_branches(&GitCli, &repos, branch, |repo| {
        confirm(&format!(
            "Branch '{branch}' does not exist in {}. Create it?",
            repo.name
        ))
    })?;
    Ok(())
}

/// Discovery runs fresh on every invocation; nothing is cached.
fn discover(config: &Config) -> Result<Vec<Repository>> {
    let folder = config.repos_folder()?;
    let repos = scan::find_repos(folder)?;
    if repos.is_empty() {
        return Err(Error::EmptyRepositorySet {
            folder: folder.to_path_buf(),
        }
        .into());
    }

    info!(count = repos.len(), folder = %folder.display(), "discovered repositories");
    Ok(repos)
}

fn set_folder(config: &mut Config, path: PathBuf) -> Result<()> {
    if !path.exists() {
        println!(
            "{}",
            style(format!("Warning: {} does not exist yet.", path.display())).yellow()
        );
    }

    let outcome = config.set_folder(path.clone(), |current| {
        confirm(&format!(
            "A repositories folder is already set ({}). Overwrite it?",
            current.display()
        ))
    })?;

    match outcome {
        SetOutcome::Saved => println!(
            "{}",
            style(format!(
                "Folder path set successfully! ({})",
                path.display()
            ))
            .green()
        ),
        SetOutcome::Cancelled => println!("Folder path left unchanged."),
    }
    Ok(())
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
