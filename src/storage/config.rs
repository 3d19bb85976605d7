//! Configuration handling for kanbn
//!
//! Configuration is read from `kanbn.toml` at the project root (project)
//! and `config.toml` in the user's config directory (global). A few
//! environment variables override both:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `KANBN_ROOT` | Project root, skipping discovery |
//! | `KANBN_CONFIG_DIR` | Directory holding the global `config.toml` |
//! | `KANBN_FORMAT` | Output format (`text` or `json`) |
//! | `KANBN_VERBOSE` | Verbose diagnostics (`1` or `true`) |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project config file name, looked up at the project root
pub const PROJECT_CONFIG_FILE: &str = "kanbn.toml";

/// Main folder name used when no project config overrides it
pub const DEFAULT_MAIN_FOLDER: &str = ".kanbn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Folder holding the board, relative to the project root
    pub main_folder: String,

    /// Index file name inside the main folder
    pub index_file: String,

    /// Task folder name inside the main folder
    pub tasks_folder: String,

    /// Archive folder name inside the main folder
    pub archive_folder: String,

    /// Columns for a fresh board when none are given
    pub default_columns: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            main_folder: DEFAULT_MAIN_FOLDER.to_string(),
            index_file: "index.md".to_string(),
            tasks_folder: "tasks".to_string(),
            archive_folder: "archive".to_string(),
            default_columns: ["Backlog", "Todo", "In Progress", "Done"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ProjectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let folders = [
            ("main_folder", &self.main_folder),
            ("index_file", &self.index_file),
            ("tasks_folder", &self.tasks_folder),
            ("archive_folder", &self.archive_folder),
        ];

        for (key, value) in folders {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{}' cannot be empty", key)));
            }
        }

        if self.tasks_folder == self.archive_folder {
            return Err(ConfigError::Invalid(
                "'tasks_folder' and 'archive_folder' must differ".to_string(),
            ));
        }

        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub format: OutputFormat,

    /// Print verbose diagnostics to stderr
    pub verbose: bool,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: PathBuf,
}

impl Config {
    /// Loads configuration from default locations and the environment
    pub fn load() -> Result<Self> {
        let project_root = match std::env::var_os("KANBN_ROOT") {
            Some(root) => PathBuf::from(root),
            None => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                Self::find_project_root(&cwd).unwrap_or(cwd)
            }
        };

        let mut config = Self::for_project(&project_root)?;
        config.apply_env();
        Ok(config)
    }

    /// Loads configuration for a specific project root
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: project_root.to_path_buf(),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("KANBN_CONFIG_DIR") {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("dev", "kanbn", "kanbn").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config.validate().context("Invalid project config")?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(format) = std::env::var("KANBN_FORMAT") {
            if let Ok(format) = <OutputFormat as clap::ValueEnum>::from_str(&format, true) {
                self.global.format = format;
            }
        }

        if let Ok(verbose) = std::env::var("KANBN_VERBOSE") {
            self.global.verbose = matches!(verbose.trim(), "1" | "true" | "yes");
        }
    }

    /// Finds the project root by walking up from `start`, looking for
    /// `kanbn.toml` or a `.kanbn/` folder
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file()
                || current.join(DEFAULT_MAIN_FOLDER).is_dir()
            {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_project_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.main_folder, ".kanbn");
        assert_eq!(config.index_file, "index.md");
        assert_eq!(config.default_columns.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
main_folder = "board"
default_columns = ["Open", "Closed"]
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.main_folder, "board");
        assert_eq!(config.tasks_folder, "tasks");
        assert_eq!(config.default_columns, vec!["Open", "Closed"]);
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
format = "json"
verbose = true
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.verbose);
    }

    #[test]
    fn same_tasks_and_archive_folder_is_invalid() {
        let config = ProjectConfig {
            archive_folder: "tasks".to_string(),
            ..ProjectConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn project_config_is_read_from_root() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "main_folder = \"kb\"\n",
        )
        .unwrap();

        let project = Config::load_project_config(dir.path()).unwrap();
        assert_eq!(project.main_folder, "kb");
    }

    #[test]
    fn broken_project_config_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "main_folder = [").unwrap();

        assert!(Config::load_project_config(dir.path()).is_err());
    }

    #[test]
    fn find_project_root_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(DEFAULT_MAIN_FOLDER)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn find_project_root_by_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "").unwrap();

        let sub_dir = dir.path().join("nested");
        fs::create_dir_all(&sub_dir).unwrap();

        assert_eq!(
            Config::find_project_root(&sub_dir).as_deref(),
            Some(dir.path())
        );
    }
}
