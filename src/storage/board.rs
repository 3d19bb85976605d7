//! Board storage
//!
//! Reads and writes the index and task files under the main folder.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use thiserror::Error;

use super::config::{Config, ProjectConfig};
use super::markdown;
use crate::domain::{Index, Task, TaskId};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Kanbn has not been initialised in this folder\nTry running: kanbn init")]
    NotInitialised,

    #[error("No columns defined in the index")]
    NoColumns,

    #[error("Column \"{0}\" doesn't exist")]
    ColumnNotFound(String),

    #[error("A task with id \"{0}\" already exists")]
    TaskExists(TaskId),

    #[error("No task with id \"{0}\" found in the index")]
    TaskNotFound(TaskId),

    #[error("An archived task with id \"{0}\" already exists")]
    ArchivedTaskExists(TaskId),

    #[error("No archived task with id \"{0}\"")]
    ArchivedTaskNotFound(TaskId),
}

/// Options for creating or updating a board.
///
/// Produced either from `init` flags or by the interactive wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the user chose to edit the description (wizard only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_description: Option<bool>,

    pub columns: Vec<String>,
}

/// A kanbn board rooted at a project directory
pub struct Board {
    root: PathBuf,
    config: ProjectConfig,
}

impl Board {
    pub fn new(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Opens the board described by the loaded configuration
    pub fn open(config: &Config) -> Self {
        Self::new(&config.project_root, config.project.clone())
    }

    /// Returns the project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the folder holding the index, tasks and archive
    pub fn main_folder(&self) -> PathBuf {
        self.root.join(&self.config.main_folder)
    }

    fn index_path(&self) -> PathBuf {
        self.main_folder().join(&self.config.index_file)
    }

    fn tasks_dir(&self) -> PathBuf {
        self.main_folder().join(&self.config.tasks_folder)
    }

    fn archive_dir(&self) -> PathBuf {
        self.main_folder().join(&self.config.archive_folder)
    }

    fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(id.file_name())
    }

    fn archived_path(&self, id: &TaskId) -> PathBuf {
        self.archive_dir().join(id.file_name())
    }

    /// Returns true if the board has an index
    pub fn initialised(&self) -> bool {
        self.index_path().is_file()
    }

    /// Creates the board, or updates name, description and columns of an
    /// existing one
    pub fn initialise(&self, options: &InitOptions) -> Result<()> {
        for dir in [self.main_folder(), self.tasks_dir(), self.archive_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let index = if self.initialised() {
            let mut index = self.index()?;
            index.name = options.name.clone();
            if let Some(description) = &options.description {
                index.description = description.clone();
            }
            if !options.columns.is_empty() {
                index.set_columns(&options.columns);
            }
            index
        } else {
            let columns = if options.columns.is_empty() {
                &self.config.default_columns
            } else {
                &options.columns
            };
            Index::new(
                options.name.clone(),
                options.description.clone().unwrap_or_default(),
                columns,
            )
        };

        self.write_index(&index)
    }

    /// Reads the index
    pub fn index(&self) -> Result<Index> {
        if !self.initialised() {
            return Err(BoardError::NotInitialised.into());
        }

        let path = self.index_path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?;

        markdown::parse_index(&content)
            .with_context(|| format!("Failed to parse index: {}", path.display()))
    }

    /// Writes the index atomically (temp file + rename) under an exclusive lock
    fn write_index(&self, index: &Index) -> Result<()> {
        let path = self.index_path();
        let temp_path = path.with_extension("md.tmp");
        let content = markdown::render_index(index, &self.config.tasks_folder);

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on index")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .context("Failed to write index")?;
            writer.flush().context("Failed to flush index")?;
        }

        fs::rename(&temp_path, &path).with_context(|| {
            format!("Failed to rename {} to {}", temp_path.display(), path.display())
        })
    }

    fn read_task_file(&self, id: &TaskId, path: &Path) -> Result<Task> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read task file: {}", path.display()))?;

        markdown::parse_task(id.clone(), &content)
            .with_context(|| format!("Failed to parse task file: {}", path.display()))
    }

    fn write_task_file(&self, task: &Task, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = markdown::render_task(task)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write task file: {}", path.display()))
    }

    /// Lists task files in the tasks folder that the index does not reference
    pub fn untracked_tasks(&self) -> Result<Vec<TaskId>> {
        let index = self.index()?;
        let mut ids: Vec<TaskId> = list_task_files(&self.tasks_dir())?
            .into_iter()
            .filter(|id| !index.contains_task(id))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Lists task IDs in the archive folder
    pub fn archived_tasks(&self) -> Result<Vec<TaskId>> {
        if !self.initialised() {
            return Err(BoardError::NotInitialised.into());
        }
        let mut ids = list_task_files(&self.archive_dir())?;
        ids.sort();
        Ok(ids)
    }

    /// Adds a new task to a column (or the first column), returning the column
    pub fn add_task(&self, task: &Task, column: Option<&str>) -> Result<String> {
        let mut index = self.index()?;
        let column = resolve_column(&index, column)?;

        if index.contains_task(&task.id) || self.task_path(&task.id).exists() {
            return Err(BoardError::TaskExists(task.id.clone()).into());
        }

        self.write_task_file(task, &self.task_path(&task.id))?;
        index.add_task(task.id.clone(), &column);
        self.write_index(&index)?;

        Ok(column)
    }

    /// Adds every untracked task to a column (or the first column)
    pub fn add_untracked(&self, column: Option<&str>) -> Result<(String, Vec<TaskId>)> {
        let mut index = self.index()?;
        let column = resolve_column(&index, column)?;
        let untracked = self.untracked_tasks()?;

        for id in &untracked {
            index.add_task(id.clone(), &column);
        }

        if !untracked.is_empty() {
            self.write_index(&index)?;
        }

        Ok((column, untracked))
    }

    /// Moves a task into the archive, returning the column it left
    pub fn archive_task(&self, id: &TaskId) -> Result<String> {
        let mut index = self.index()?;

        let column = index
            .task_column(id)
            .map(str::to_string)
            .ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;

        let archived_path = self.archived_path(id);
        if archived_path.exists() {
            return Err(BoardError::ArchivedTaskExists(id.clone()).into());
        }

        let task_path = self.task_path(id);
        let mut task = self.read_task_file(id, &task_path)?;
        task.mark_archived_from(&column);

        self.write_task_file(&task, &archived_path)?;
        index.remove_task(id);
        self.write_index(&index)?;

        fs::remove_file(&task_path)
            .with_context(|| format!("Failed to remove task file: {}", task_path.display()))?;

        Ok(column)
    }

    /// Moves a task out of the archive, returning the column it landed in.
    ///
    /// Column priority: the given column, then the one recorded when the
    /// task was archived, then the first column.
    pub fn restore_task(&self, id: &TaskId, column: Option<&str>) -> Result<String> {
        let mut index = self.index()?;

        let archived_path = self.archived_path(id);
        if !archived_path.exists() {
            return Err(BoardError::ArchivedTaskNotFound(id.clone()).into());
        }

        let task_path = self.task_path(id);
        if index.contains_task(id) || task_path.exists() {
            return Err(BoardError::TaskExists(id.clone()).into());
        }

        let mut task = self.read_task_file(id, &archived_path)?;
        let recorded = task.take_archived_column();
        let column = match column {
            Some(column) => resolve_column(&index, Some(column))?,
            None => match recorded.filter(|c| index.has_column(c)) {
                Some(column) => column,
                None => resolve_column(&index, None)?,
            },
        };

        self.write_task_file(&task, &task_path)?;
        index.add_task(id.clone(), &column);
        self.write_index(&index)?;

        fs::remove_file(&archived_path).with_context(|| {
            format!("Failed to remove archived task: {}", archived_path.display())
        })?;

        Ok(column)
    }
}

/// Picks the named column, or the first column when none is named
fn resolve_column(index: &Index, column: Option<&str>) -> Result<String, BoardError> {
    match column {
        Some(name) if index.has_column(name) => Ok(name.to_string()),
        Some(name) => Err(BoardError::ColumnNotFound(name.to_string())),
        None => index
            .first_column()
            .map(str::to_string)
            .ok_or(BoardError::NoColumns),
    }
}

/// Lists `*.md` files in a folder whose stems are valid task IDs
fn list_task_files(dir: &Path) -> Result<Vec<TaskId>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut ids = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if path.extension().is_some_and(|e| e == "md") {
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<TaskId>().ok())
            {
                ids.push(id);
            }
        }
    }

    Ok(ids)
}
