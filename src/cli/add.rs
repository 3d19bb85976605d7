//! `add` command

use anyhow::Result;

use super::args::{ArgSchema, OptionSpec};
use super::routes::Invocation;
use crate::domain::Task;
use crate::storage::{Board, BoardError};

pub const SCHEMA: ArgSchema = ArgSchema {
    options: &[
        OptionSpec::text("name", Some('n'), "Task name"),
        OptionSpec::text("description", Some('d'), "Task description"),
        OptionSpec::text("column", Some('c'), "Column to add the task to (default: first column)"),
        OptionSpec::list("tag", Some('t'), "Tag, repeat for more tags"),
        OptionSpec::flag("untracked", Some('u'), "Add task files that are not on the board yet"),
    ],
    positional: None,
};

pub fn run(inv: &Invocation<'_>) -> Result<()> {
    let board = Board::open(inv.config);
    if !board.initialised() {
        return Err(BoardError::NotInitialised.into());
    }

    if inv.args.flag("untracked") {
        return add_untracked(inv, &board);
    }

    let name = inv
        .args
        .text("name")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Task name cannot be blank"))?;

    let mut task = Task::new(name)?;
    if let Some(description) = inv.args.text("description") {
        task.set_description(description);
    }
    for tag in inv.args.list("tag") {
        task.add_tag(tag.as_str());
    }

    inv.output.verbose_ctx("add", &format!("Adding task '{}' as {}", task.name, task.id));
    let column = board.add_task(&task, inv.args.text("column"))?;

    if inv.output.is_json() {
        inv.output.data(&serde_json::json!({
            "id": task.id,
            "name": task.name,
            "column": column,
            "tags": task.tags,
        }));
    } else {
        inv.output
            .success(&format!("Added task \"{}\" to column \"{}\"", task.id, column));
    }

    Ok(())
}

fn add_untracked(inv: &Invocation<'_>, board: &Board) -> Result<()> {
    let (column, added) = board.add_untracked(inv.args.text("column"))?;
    inv.output.verbose_ctx("add", &format!("Found {} untracked task(s)", added.len()));

    if inv.output.is_json() {
        inv.output.data(&serde_json::json!({
            "column": column,
            "added": added,
        }));
    } else if added.is_empty() {
        inv.output.success("No untracked tasks to add");
    } else {
        for id in &added {
            inv.output
                .success(&format!("Added untracked task \"{}\" to column \"{}\"", id, column));
        }
    }

    Ok(())
}
