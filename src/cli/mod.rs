//! # Command-Line Interface
//!
//! Route registry, argument parsing and the command controllers.
//!
//! ## Dispatch
//!
//! 1. [`resolve`](resolve::resolve) matches the first token against route aliases
//! 2. Generic parse detects `help` topics and `--help`/`-h`
//! 3. The effective route's schema parses the full argv again
//! 4. The controller runs with an [`Invocation`]
//!
//! ## Commands
//!
//! | Route | Aliases | Purpose |
//! |-------|---------|---------|
//! | help | `help`, `h` | Show general or command help |
//! | init | `init`, `i` | Create or update a board |
//! | add | `add`, `a` | Add a task |
//! | archive | `archive` | Move a task to the archive |
//! | restore | `restore` | Bring an archived task back |
//! | version | `version`, `v` | Print the version |
//!
//! ## Output Formats
//!
//! Set `format = "json"` in the global config or `KANBN_FORMAT=json` for
//! machine-readable output. `KANBN_VERBOSE=1` prints diagnostics to stderr.

mod app;
mod output;
pub mod args;
pub mod resolve;
pub mod routes;
pub mod prompt;
pub mod wizard;
mod help;
mod init;
mod add;
mod archive;
mod restore;
mod version;

pub use app::{dispatch, run};
pub use output::{Output, OutputFormat};
pub use resolve::DispatchError;
pub use routes::{Invocation, Route, RouteTable};
