//! `restore` command

use anyhow::Result;

use super::args::{ArgSchema, OptionSpec};
use super::routes::Invocation;
use crate::domain::TaskId;
use crate::storage::Board;

pub const SCHEMA: ArgSchema = ArgSchema {
    options: &[OptionSpec::text(
        "column",
        Some('c'),
        "Column to restore into (default: the column it was archived from)",
    )],
    positional: Some("<task>"),
};

pub fn run(inv: &Invocation<'_>) -> Result<()> {
    let board = Board::open(inv.config);

    let id: TaskId = inv
        .args
        .operand()
        .ok_or_else(|| anyhow::anyhow!("No task id specified\nTry running: kanbn restore <task>"))?
        .parse()?;

    let column = board.restore_task(&id, inv.args.text("column"))?;

    if inv.output.is_json() {
        inv.output.data(&serde_json::json!({
            "id": id,
            "column": column,
        }));
    } else {
        inv.output
            .success(&format!("Restored task \"{}\" to column \"{}\"", id, column));
    }

    Ok(())
}
