//! Line input for interactive prompts
//!
//! [`TerminalInput`] reads keystrokes in raw mode so it can handle editing
//! and Ctrl+C itself. [`ReaderInput`] reads newline-terminated lines from
//! any reader and is used when stdin is not a terminal.

use std::fmt;
use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Interrupted")]
    Interrupted,

    #[error("Terminal input failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Confirm,
}

/// A question shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    pub default: Option<String>,
    pub kind: PromptKind,
}

impl Prompt {
    pub fn text(message: impl Into<String>, default: Option<String>) -> Self {
        Self {
            message: message.into(),
            default,
            kind: PromptKind::Text,
        }
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
            kind: PromptKind::Confirm,
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "? {}", self.message)?;
        match (&self.kind, &self.default) {
            (PromptKind::Confirm, _) => write!(f, " (y/n)"),
            (PromptKind::Text, Some(default)) => write!(f, " ({})", default),
            (PromptKind::Text, None) => Ok(()),
        }
    }
}

/// Source of answers for the wizard
pub trait LineSource {
    /// Shows the prompt and blocks until a full line is entered
    fn read_line(&mut self, prompt: &Prompt) -> Result<String, PromptError>;
}

/// Reads lines from a buffered reader, echoing prompts to a writer
pub struct ReaderInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ReaderInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderInput<R, W> {
    fn read_line(&mut self, prompt: &Prompt) -> Result<String, PromptError> {
        write!(self.writer, "{} ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Err(PromptError::Interrupted);
        }

        let line = line.trim_end_matches(['\r', '\n']).to_string();
        writeln!(self.writer, "{}", line)?;
        Ok(line)
    }
}

/// Reads keystrokes from the terminal in raw mode
pub struct TerminalInput;

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &Prompt) -> Result<String, PromptError> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", prompt)?;
        stdout.flush()?;

        terminal::enable_raw_mode()?;
        let result = read_raw_line(&mut stdout);
        let restored = terminal::disable_raw_mode();

        writeln!(stdout)?;
        restored?;
        result
    }
}

/// Collects keystrokes until Enter. Arrow keys are ignored.
fn read_raw_line(out: &mut impl Write) -> Result<String, PromptError> {
    let mut line = String::new();

    loop {
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(PromptError::Interrupted);
            }
            KeyCode::Enter => return Ok(line),
            KeyCode::Backspace => {
                if line.pop().is_some() {
                    write!(out, "\u{8} \u{8}")?;
                    out.flush()?;
                }
            }
            KeyCode::Char(c) if is_plain(key.modifiers) => {
                line.push(c);
                write!(out, "{}", c)?;
                out.flush()?;
            }
            _ => {}
        }
    }
}

/// True for keys typed without modifiers other than Shift
fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}
