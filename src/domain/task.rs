//! Task domain model
//!
//! A task is a markdown document: YAML frontmatter for metadata, a `# name`
//! heading and a free-form description below it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{IdError, TaskId};

/// Task metadata stored in the YAML frontmatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFrontmatter {
    pub created: DateTime<Utc>,

    pub updated: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Column the task was in when it was archived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// A task on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub tags: Vec<String>,
    pub column: Option<String>,
}

impl Task {
    /// Creates a new task, deriving its ID from the name
    pub fn new(name: impl Into<String>) -> Result<Self, IdError> {
        let name = name.into();
        let id = TaskId::from_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id,
            name,
            description: String::new(),
            created: now,
            updated: now,
            tags: Vec::new(),
            column: None,
        })
    }

    /// Builds a task from its stored parts
    pub fn from_parts(id: TaskId, frontmatter: TaskFrontmatter, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            created: frontmatter.created,
            updated: frontmatter.updated,
            tags: frontmatter.tags,
            column: frontmatter.column,
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// Adds a tag if not already present
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.touch();
        }
    }

    /// Records the column the task leaves when archived
    pub fn mark_archived_from(&mut self, column: impl Into<String>) {
        self.column = Some(column.into());
        self.touch();
    }

    /// Clears the archived column, returning it
    pub fn take_archived_column(&mut self) -> Option<String> {
        let column = self.column.take();
        if column.is_some() {
            self.touch();
        }
        column
    }

    fn touch(&mut self) {
        self.updated = Utc::now();
    }
}

impl From<&Task> for TaskFrontmatter {
    fn from(task: &Task) -> Self {
        Self {
            created: task.created,
            updated: task.updated,
            tags: task.tags.clone(),
            column: task.column.clone(),
        }
    }
}
