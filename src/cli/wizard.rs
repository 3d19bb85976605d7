//! Interactive board setup
//!
//! The wizard is a state machine: [`WizardState::advance`] takes the current
//! state and one line of input and returns the next state, the same state
//! with a validation error, or the finished [`InitOptions`]. Nothing in here
//! touches the terminal; [`run`] drives the machine from a [`LineSource`].
//!
//! ```text
//! AskName -> AskDescriptionToggle -y-> AskDescription -> AskColumnsToggle
//!                                 -n------------------->
//! AskColumnsToggle -y-> AskColumn -> AskMoreColumns -y-> AskColumn
//!                  -n-> finished                    -n-> finished
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use thiserror::Error;

use super::prompt::{LineSource, Prompt};
use crate::domain::Index;
use crate::storage::InitOptions;

/// Rejected answers. The wizard re-asks the same question after printing one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Project name cannot be empty")]
    EmptyProjectName,

    #[error("Column name cannot be empty")]
    EmptyColumnName,

    #[error("Column name already exists")]
    DuplicateColumnName,
}

/// Current question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AskName,
    AskDescriptionToggle,
    AskDescription,
    AskColumnsToggle,
    AskColumn,
    AskMoreColumns,
}

/// Values seeded from an existing board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardDefaults {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl From<&Index> for WizardDefaults {
    fn from(index: &Index) -> Self {
        Self {
            name: Some(index.name.clone()),
            columns: index.column_names(),
        }
    }
}

/// Accumulated answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    step: Step,
    defaults: WizardDefaults,
    project_name: Option<String>,
    description_requested: Option<bool>,
    description: Option<String>,
    columns: Vec<String>,
    pending_column_input: String,
}

/// Result of feeding one line to the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved on to the next question
    Next(WizardState),
    /// Answer rejected; same question again
    Retry(WizardState, Option<ValidationError>),
    /// All questions answered
    Finished(InitOptions),
}

impl WizardState {
    pub fn new(defaults: WizardDefaults) -> Self {
        Self {
            step: Step::AskName,
            defaults,
            project_name: None,
            description_requested: None,
            description: None,
            columns: Vec::new(),
            pending_column_input: String::new(),
        }
    }

    /// The question for the current step
    pub fn prompt(&self) -> Prompt {
        match self.step {
            Step::AskName => Prompt::text("Project name:", self.defaults.name.clone()),
            Step::AskDescriptionToggle => Prompt::confirm("Add/edit the project description?"),
            Step::AskDescription => Prompt::text("Project description:", None),
            Step::AskColumnsToggle => Prompt::confirm("Add/edit column names?"),
            Step::AskColumn => Prompt::text("Column name:", None),
            Step::AskMoreColumns => Prompt::confirm("Add another column?"),
        }
    }

    /// Consumes one line of input
    pub fn advance(self, input: &str) -> Transition {
        match self.step {
            Step::AskName => self.answer_name(input),
            Step::AskDescriptionToggle => match parse_yes_no(input) {
                Some(true) => self.next(|s| {
                    s.description_requested = Some(true);
                    s.step = Step::AskDescription;
                }),
                Some(false) => self.next(|s| {
                    s.description_requested = Some(false);
                    s.step = Step::AskColumnsToggle;
                }),
                None => Transition::Retry(self, None),
            },
            Step::AskDescription => self.next(|s| {
                s.description = Some(input.to_string());
                s.step = Step::AskColumnsToggle;
            }),
            Step::AskColumnsToggle => match parse_yes_no(input) {
                Some(true) => self.next(|s| s.step = Step::AskColumn),
                Some(false) => {
                    let columns = self.defaults.columns.clone();
                    self.finish(columns)
                }
                None => Transition::Retry(self, None),
            },
            Step::AskColumn => self.answer_column(input),
            Step::AskMoreColumns => match parse_yes_no(input) {
                Some(true) => self.next(|s| s.step = Step::AskColumn),
                Some(false) => {
                    let columns = self.columns.clone();
                    self.finish(columns)
                }
                None => Transition::Retry(self, None),
            },
        }
    }

    fn next(mut self, update: impl FnOnce(&mut Self)) -> Transition {
        update(&mut self);
        Transition::Next(self)
    }

    fn answer_name(self, input: &str) -> Transition {
        let name = input.trim();
        let name = if name.is_empty() {
            self.defaults.name.clone().filter(|n| !n.trim().is_empty())
        } else {
            Some(name.to_string())
        };

        match name {
            Some(name) => self.next(|s| {
                s.project_name = Some(name);
                s.step = Step::AskDescriptionToggle;
            }),
            None => Transition::Retry(self, Some(ValidationError::EmptyProjectName)),
        }
    }

    fn answer_column(mut self, input: &str) -> Transition {
        self.pending_column_input = input.to_string();

        match check_column_name(&self.columns, input) {
            Ok(column) => self.next(|s| {
                s.columns.push(column);
                s.pending_column_input.clear();
                s.step = Step::AskMoreColumns;
            }),
            Err(error) => Transition::Retry(self, Some(error)),
        }
    }

    fn finish(self, columns: Vec<String>) -> Transition {
        let set_description = self.description_requested.unwrap_or(false);

        Transition::Finished(InitOptions {
            name: self.project_name.unwrap_or_default(),
            description: if set_description { self.description } else { None },
            set_description: Some(set_description),
            columns,
        })
    }
}

/// Trims a column name and checks it against the columns collected so far
pub fn check_column_name(columns: &[String], input: &str) -> Result<String, ValidationError> {
    let column = input.trim();

    if column.is_empty() {
        return Err(ValidationError::EmptyColumnName);
    }
    if columns.iter().any(|c| c == column) {
        return Err(ValidationError::DuplicateColumnName);
    }

    Ok(column.to_string())
}

/// Accepts `y`/`n` in either case
fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

/// Runs the wizard to completion, printing validation errors to `errors`
pub fn run(
    defaults: WizardDefaults,
    input: &mut dyn LineSource,
    errors: &mut dyn Write,
) -> Result<InitOptions> {
    let mut state = WizardState::new(defaults);

    loop {
        let line = input.read_line(&state.prompt())?;

        state = match state.advance(&line) {
            Transition::Next(next) => next,
            Transition::Retry(same, error) => {
                if let Some(error) = error {
                    writeln!(errors, "{}", error).context("Failed to write prompt error")?;
                }
                same
            }
            Transition::Finished(options) => return Ok(options),
        };
    }
}
