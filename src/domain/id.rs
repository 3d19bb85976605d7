//! Task identifiers
//!
//! A task ID is derived from the task name: lower-cased, with every run of
//! characters that are not ASCII letters or digits collapsed into a single
//! `-`, and no leading or trailing dashes.
//!
//! - `"Fix the Login bug!"` -> `fix-the-login-bug`
//! - `"v2.0 release"` -> `v2-0-release`
//!
//! The same ID is used as the task's file stem (`tasks/{id}.md`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Task name '{0}' does not produce a valid task id")]
    EmptyName(String),

    #[error("Invalid task id '{0}': expected lower-case letters, digits and dashes")]
    InvalidTaskId(String),
}

/// Task ID in the form `lower-case-words`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Derives a task ID from a task name
    pub fn from_name(name: &str) -> Result<Self, IdError> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if slug.is_empty() {
            return Err(IdError::EmptyName(name.to_string()));
        }

        Ok(Self(slug))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the file name used for this task
    pub fn file_name(&self) -> String {
        format!("{}.md", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && !s.starts_with('-')
            && !s.ends_with('-')
            && !s.contains("--")
            && s
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(IdError::InvalidTaskId(s.to_string()))
        }
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}
