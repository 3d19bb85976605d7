//! Domain models for kanbn
//!
//! Contains the board and task models without any I/O concerns.

mod id;
mod index;
mod task;

pub use id::{IdError, TaskId};
pub use index::{Column, Index};
pub use task::{Task, TaskFrontmatter};
