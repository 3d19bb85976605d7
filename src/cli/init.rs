//! `init` command

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Result;

use super::args::{ArgSchema, OptionSpec, ParsedArgs};
use super::prompt::{LineSource, ReaderInput, TerminalInput};
use super::routes::Invocation;
use super::wizard::{self, ValidationError, WizardDefaults};
use crate::domain::Index;
use crate::storage::{Board, InitOptions};

pub const SCHEMA: ArgSchema = ArgSchema {
    options: &[
        OptionSpec::flag("interactive", Some('i'), "Answer questions to set up the board"),
        OptionSpec::text("name", Some('n'), "Board name"),
        OptionSpec::text("description", Some('d'), "Board description"),
        OptionSpec::list("column", Some('c'), "Column name, repeat for more columns"),
    ],
    positional: None,
};

pub fn run(inv: &Invocation<'_>) -> Result<()> {
    let board = Board::open(inv.config);
    let initialised = board.initialised();
    let existing = if initialised { Some(board.index()?) } else { None };

    inv.output.verbose_ctx(
        "init",
        &format!(
            "Board at {} (initialised: {}), argv: {:?}",
            board.main_folder().display(),
            initialised,
            inv.argv
        ),
    );

    let options = if inv.args.flag("interactive") {
        let defaults = existing.as_ref().map(WizardDefaults::from).unwrap_or_default();
        interactive(defaults)?
    } else {
        options_from_args(&inv.args, existing.as_ref(), board.root())?
    };

    if let Ok(json) = serde_json::to_string(&options) {
        inv.output.verbose_ctx("init", &format!("Initialising with {}", json));
    }

    board.initialise(&options)?;

    let main_folder = board.main_folder();
    if initialised {
        inv.output.success(&format!(
            "Reinitialised existing kanbn board in {}",
            main_folder.display()
        ));
    } else {
        inv.output.success(&format!(
            "Initialised empty kanbn board in {}",
            main_folder.display()
        ));
    }

    Ok(())
}

fn interactive(defaults: WizardDefaults) -> Result<InitOptions> {
    let stdin = io::stdin();
    let mut source: Box<dyn LineSource> = if stdin.is_terminal() {
        Box::new(TerminalInput)
    } else {
        Box::new(ReaderInput::new(stdin.lock(), io::stdout()))
    };

    wizard::run(defaults, source.as_mut(), &mut io::stderr())
}

/// Builds board options from flags, falling back to the existing board
/// and then to the project folder name.
///
/// `--column` values follow the same rules as wizard answers.
pub fn options_from_args(
    args: &ParsedArgs,
    existing: Option<&Index>,
    root: &Path,
) -> Result<InitOptions, ValidationError> {
    let name = args
        .text("name")
        .filter(|n| !n.trim().is_empty())
        .map(str::to_string)
        .or_else(|| existing.map(|index| index.name.clone()))
        .unwrap_or_else(|| folder_name(root));

    let description = args
        .text("description")
        .map(str::to_string)
        .or_else(|| existing.map(|index| index.description.clone()));

    let columns = if args.list("column").is_empty() {
        existing.map(Index::column_names).unwrap_or_default()
    } else {
        let mut columns = Vec::new();
        for input in args.list("column") {
            let column = wizard::check_column_name(&columns, input)?;
            columns.push(column);
        }
        columns
    };

    Ok(InitOptions {
        name,
        description,
        set_description: None,
        columns,
    })
}

fn folder_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Project")
        .to_string()
}
