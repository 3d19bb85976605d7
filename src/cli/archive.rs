//! `archive` command

use anyhow::Result;

use super::args::{ArgSchema, OptionSpec};
use super::routes::Invocation;
use crate::domain::TaskId;
use crate::storage::Board;

pub const SCHEMA: ArgSchema = ArgSchema {
    options: &[OptionSpec::flag("list", Some('l'), "List archived tasks")],
    positional: Some("<task>"),
};

pub fn run(inv: &Invocation<'_>) -> Result<()> {
    let board = Board::open(inv.config);

    if inv.args.flag("list") {
        return list(inv, &board);
    }

    let id: TaskId = inv
        .args
        .operand()
        .ok_or_else(|| anyhow::anyhow!("No task id specified\nTry running: kanbn archive <task>"))?
        .parse()?;

    let column = board.archive_task(&id)?;
    inv.output.verbose_ctx("archive", &format!("Task {} left column '{}'", id, column));
    inv.output.success(&format!("Archived task \"{}\"", id));

    Ok(())
}

fn list(inv: &Invocation<'_>, board: &Board) -> Result<()> {
    let archived = board.archived_tasks()?;

    if inv.output.is_json() {
        inv.output.data(&archived);
    } else if archived.is_empty() {
        inv.output.line("No archived tasks");
    } else {
        for id in &archived {
            inv.output.line(id.as_str());
        }
    }

    Ok(())
}
