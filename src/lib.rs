//! kanbn - a kanban board for the command line
//!
//! Boards live next to the code as markdown: an index listing columns and
//! their tasks, plus one file per task.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Index, Task, TaskId};
pub use storage::{Board, Config, InitOptions};
