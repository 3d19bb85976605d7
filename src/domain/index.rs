//! Board index
//!
//! The index is the board itself: a name, a description, and an ordered
//! list of columns, each holding an ordered list of task IDs.

use serde::Serialize;

use super::id::TaskId;

/// A single board column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub tasks: Vec<TaskId>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// The board index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub description: String,
    pub columns: Vec<Column>,
}

impl Index {
    /// Creates an index with empty columns
    pub fn new(name: impl Into<String>, description: impl Into<String>, columns: &[String]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            columns: columns.iter().map(Column::new).collect(),
        }
    }

    /// Returns column names in board order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns the name of the first column, if any
    pub fn first_column(&self) -> Option<&str> {
        self.columns.first().map(|c| c.name.as_str())
    }

    /// Returns the column containing a task
    pub fn task_column(&self, id: &TaskId) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.tasks.contains(id))
            .map(|c| c.name.as_str())
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.task_ids().any(|t| t == id)
    }

    /// Iterates over every tracked task ID in board order
    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.columns.iter().flat_map(|c| c.tasks.iter())
    }

    /// Appends a task to a column. Returns false if the column does not exist.
    pub fn add_task(&mut self, id: TaskId, column: &str) -> bool {
        match self.columns.iter_mut().find(|c| c.name == column) {
            Some(col) => {
                col.tasks.push(id);
                true
            }
            None => false,
        }
    }

    /// Removes a task, returning the column it was in
    pub fn remove_task(&mut self, id: &TaskId) -> Option<String> {
        for column in &mut self.columns {
            if let Some(pos) = column.tasks.iter().position(|t| t == id) {
                column.tasks.remove(pos);
                return Some(column.name.clone());
            }
        }
        None
    }

    /// Rebuilds the column list in the given order.
    ///
    /// Columns that already exist keep their tasks; new names start empty;
    /// columns not named are dropped along with their task references.
    pub fn set_columns(&mut self, names: &[String]) {
        let mut old = std::mem::take(&mut self.columns);
        self.columns = names
            .iter()
            .map(|name| match old.iter().position(|c| &c.name == name) {
                Some(pos) => old.swap_remove(pos),
                None => Column::new(name.clone()),
            })
            .collect();
    }
}
