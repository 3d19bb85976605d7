//! Route registry
//!
//! Routes are declared statically in registry order. Resolution scans them
//! in that order, so if two routes ever shared an alias the first one
//! registered would win. The built-in table keeps aliases unique.

use std::fmt;

use anyhow::Result;

use super::args::{ArgSchema, ParsedArgs};
use super::output::Output;
use super::{add, archive, help, init, restore, version};
use crate::storage::Config;

/// Everything a controller receives for one invocation
pub struct Invocation<'a> {
    /// Effective route ID (for help, the topic route)
    pub route_id: &'a str,
    /// Raw argument vector, without the program name
    pub argv: &'a [String],
    /// Arguments parsed with the effective route's schema
    pub args: ParsedArgs,
    pub routes: &'a RouteTable,
    pub config: &'a Config,
    pub output: &'a Output,
}

/// Handler invoked after dispatch
pub type Controller = fn(&Invocation<'_>) -> Result<()>;

/// A named command entry point
#[derive(Clone)]
pub struct Route {
    pub id: &'static str,
    pub aliases: &'static [&'static str],
    pub summary: &'static str,
    pub schema: ArgSchema,
    pub controller: Controller,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Ordered, read-only set of routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The routes kanbn ships with
    pub fn builtin() -> Self {
        Self::new(vec![
            Route {
                id: help::ROUTE_ID,
                aliases: &["help", "h"],
                summary: "Show help for kanbn or for a command",
                schema: help::SCHEMA,
                controller: help::run,
            },
            Route {
                id: "init",
                aliases: &["init", "i"],
                summary: "Create a new board or update an existing one",
                schema: init::SCHEMA,
                controller: init::run,
            },
            Route {
                id: "add",
                aliases: &["add", "a"],
                summary: "Add a task to the board",
                schema: add::SCHEMA,
                controller: add::run,
            },
            Route {
                id: "archive",
                aliases: &["archive"],
                summary: "Move a task to the archive, or list archived tasks",
                schema: archive::SCHEMA,
                controller: archive::run,
            },
            Route {
                id: "restore",
                aliases: &["restore"],
                summary: "Move a task from the archive back onto the board",
                schema: restore::SCHEMA,
                controller: restore::run,
            },
            Route {
                id: "version",
                aliases: &["version", "v"],
                summary: "Show the kanbn version",
                schema: version::SCHEMA,
                controller: version::run,
            },
        ])
    }

    /// Looks up a route by ID
    pub fn get(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// Returns the first route owning an alias
    pub fn find_by_alias(&self, alias: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.aliases.contains(&alias))
    }

    /// Iterates over routes in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// All aliases flattened in registry order, paired with their route
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &Route)> {
        self.routes
            .iter()
            .flat_map(|route| route.aliases.iter().map(move |alias| (*alias, route)))
    }

    /// Aliases claimed by more than one route
    pub fn overlapping_aliases(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        let mut overlapping = Vec::new();

        for (alias, _) in self.aliases() {
            if seen.contains(&alias) {
                if !overlapping.contains(&alias) {
                    overlapping.push(alias);
                }
            } else {
                seen.push(alias);
            }
        }

        overlapping
    }
}
