//! # Storage Layer
//!
//! Persistence for kanbn boards as plain markdown files.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Index | Markdown headings and link lists | `.kanbn/index.md` |
//! | Tasks | Markdown + YAML frontmatter | `.kanbn/tasks/{id}.md` |
//! | Archive | Same as tasks | `.kanbn/archive/{id}.md` |
//! | Config | TOML | `kanbn.toml`, `~/.config/kanbn/config.toml` |
//!
//! Index writes are atomic (temp file + rename) and take an exclusive
//! `fs2` lock while writing.
//!
//! ## Key Types
//!
//! - [`Board`] - Entry point for reading and changing a board
//! - [`InitOptions`] - Board settings passed to [`Board::initialise`]
//! - [`Config`] - Project and global configuration

mod board;
mod config;
mod markdown;

pub use board::{Board, BoardError, InitOptions};
pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, DEFAULT_MAIN_FOLDER,
    PROJECT_CONFIG_FILE,
};
