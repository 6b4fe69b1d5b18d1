use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Key used both in the settings file and as the environment variable.
const FOLDER_KEY: &str = "REPOS_FOLDER";

/// What a `set_folder` call ended up doing.
#[derive(Debug, PartialEq, Eq)]
pub enum SetOutcome {
    Saved,
    Cancelled,
}

/// Resolved configuration, built once at process start and passed into each
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    repos_folder: Option<PathBuf>,
    settings_path: PathBuf,
}

pub fn get_default_settings_path() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("", "", "githerd").context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("githerd.conf"))
}

impl Config {
    /// Loads the configuration from the settings file (if present) and the
    /// `REPOS_FOLDER` environment variable, which wins when both are set.
    /// The environment is read here, once; nothing else consults it.
    pub fn load(settings_path: Option<PathBuf>) -> Result<Self> {
        let path = match settings_path {
            Some(p) => p,
            None => get_default_settings_path()?,
        };

        let mut config = Self::from_file(path)?;
        if let Some(folder) = env::var_os(FOLDER_KEY).filter(|v| !v.is_empty()) {
            config.repos_folder = Some(PathBuf::from(folder));
        }
        Ok(config)
    }

    fn from_file(settings_path: PathBuf) -> Result<Self> {
        let repos_folder = if settings_path.exists() {
            let contents = fs::read_to_string(&settings_path).with_context(|| {
                format!("Failed to read settings file: {}", settings_path.display())
            })?;
            parse_folder(&contents)
        } else {
            None
        };

        Ok(Self {
            repos_folder,
            settings_path,
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// The configured repositories folder.
    pub fn repos_folder(&self) -> std::result::Result<&Path, Error> {
        self.repos_folder
            .as_deref()
            .ok_or(Error::ConfigurationMissing)
    }

    /// Persists `folder` as the repositories folder. When a folder is already
    /// configured, `confirm_overwrite` is asked first with the current value;
    /// a `false` answer leaves everything untouched.
    ///
    /// The settings file holds this single key, so each save rewrites the
    /// whole file.
    pub fn set_folder(
        &mut self,
        folder: PathBuf,
        confirm_overwrite: impl FnOnce(&Path) -> std::io::Result<bool>,
    ) -> Result<SetOutcome> {
        if let Some(current) = &self.repos_folder {
            if !confirm_overwrite(current)? {
                return Ok(SetOutcome::Cancelled);
            }
        }

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        fs::write(
            &self.settings_path,
            format!("{FOLDER_KEY}={}\n", folder.display()),
        )
        .with_context(|| {
            format!(
                "Failed to write settings file: {}",
                self.settings_path.display()
            )
        })?;

        self.repos_folder = Some(folder);
        Ok(SetOutcome::Saved)
    }
}

fn parse_folder(contents: &str) -> Option<PathBuf> {
    contents
        .lines()
        .find_map(|line| {
            line.strip_prefix(FOLDER_KEY)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(|value| PathBuf::from(value.trim()))
        .filter(|folder| !folder.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_folder() {
        assert_eq!(
            parse_folder("REPOS_FOLDER=/home/me/repos\n"),
            Some(PathBuf::from("/home/me/repos"))
        );
        assert_eq!(parse_folder(""), None);
        assert_eq!(parse_folder("REPOS_FOLDER=\n"), None);
        assert_eq!(parse_folder("OTHER_KEY=/elsewhere\n"), None);
    }

    #[test]
    fn test_missing_file_means_unset() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::from_file(temp_dir.path().join("nonexistent.conf"))?;

        assert!(matches!(
            config.repos_folder(),
            Err(Error::ConfigurationMissing)
        ));
        Ok(())
    }

    #[test]
    fn test_set_folder_round_trip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let settings = temp_dir.path().join("githerd.conf");

        let mut config = Config::from_file(settings.clone())?;
        let outcome = config.set_folder(PathBuf::from("/repos/X"), |_| {
            panic!("confirmation must not be asked when nothing is set")
        })?;
        assert_eq!(outcome, SetOutcome::Saved);
        assert_eq!(config.repos_folder()?, Path::new("/repos/X"));

        // A fresh load sees the persisted value.
        let reloaded = Config::from_file(settings.clone())?;
        assert_eq!(reloaded.repos_folder()?, Path::new("/repos/X"));

        // Single-line file, exactly the documented layout.
        assert_eq!(fs::read_to_string(&settings)?, "REPOS_FOLDER=/repos/X\n");
        Ok(())
    }

    #[test]
    fn test_set_folder_overwrite_confirmed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let settings = temp_dir.path().join("githerd.conf");
        fs::write(&settings, "REPOS_FOLDER=/repos/A\n")?;

        let mut config = Config::from_file(settings.clone())?;
        let outcome = config.set_folder(PathBuf::from("/repos/B"), |current| {
            assert_eq!(current, Path::new("/repos/A"));
            Ok(true)
        })?;

        assert_eq!(outcome, SetOutcome::Saved);
        assert_eq!(config.repos_folder()?, Path::new("/repos/B"));
        assert_eq!(
            Config::from_file(settings)?.repos_folder()?,
            Path::new("/repos/B")
        );
        Ok(())
    }

    #[test]
    fn test_set_folder_overwrite_declined_keeps_old_value() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let settings = temp_dir.path().join("githerd.conf");
        fs::write(&settings, "REPOS_FOLDER=/repos/A\n")?;

        let mut config = Config::from_file(settings.clone())?;
        let outcome = config.set_folder(PathBuf::from("/repos/B"), |_| Ok(false))?;

        assert_eq!(outcome, SetOutcome::Cancelled);
        assert_eq!(config.repos_folder()?, Path::new("/repos/A"));
        assert_eq!(
            Config::from_file(settings)?.repos_folder()?,
            Path::new("/repos/A")
        );
        Ok(())
    }

    #[test]
    fn test_get_default_settings_path() -> Result<()> {
        let path = get_default_settings_path()?;
        assert!(path.ends_with("githerd.conf"));
        Ok(())
    }
}
