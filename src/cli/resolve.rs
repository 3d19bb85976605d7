//! Command resolution and help disambiguation

use thiserror::Error;

use super::args::GenericArgs;
use super::help::ROUTE_ID as HELP_ROUTE;
use super::routes::{Controller, Route, RouteTable};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown command \"{0}\"\nTry running: kanbn help")]
    UnknownCommand(String),
}

/// The route selected by the command word
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub route_id: &'static str,
    pub route: &'a Route,
}

/// The route actually dispatched to, after any help override
#[derive(Clone, Copy)]
pub struct Effective<'a> {
    /// Route whose ID and schema are used
    pub route: &'a Route,
    /// Handler to run; the help renderer when help was requested
    pub controller: Controller,
    pub help_requested: bool,
}

/// Finds the route whose aliases contain the command word (`argv[0]`).
///
/// Matching is exact; the first route in registry order wins.
pub fn resolve<'a>(argv: &[String], routes: &'a RouteTable) -> Result<Resolved<'a>, DispatchError> {
    let word = argv.first().map(String::as_str).unwrap_or("");

    routes
        .find_by_alias(word)
        .map(|route| Resolved {
            route_id: route.id,
            route,
        })
        .ok_or_else(|| DispatchError::UnknownCommand(word.to_string()))
}

/// Picks the help topic from the positional tokens of the invocation.
///
/// The rightmost token that is any route's alias wins, so `help add` and
/// `add --help` both pick `add`. Falls back to the help route itself.
pub fn help_topic<'t>(positional: &'t [String], routes: &RouteTable) -> &'t str {
    positional
        .iter()
        .rev()
        .find(|token| routes.aliases().any(|(alias, _)| alias == token.as_str()))
        .map(String::as_str)
        .unwrap_or(HELP_ROUTE)
}

/// Applies the help override to a resolved route.
///
/// When the command word is `help` or `--help`/`-h` was passed, the topic
/// route's ID and schema are kept but the help route's controller runs.
pub fn effective_route<'a>(
    resolved: Resolved<'a>,
    routes: &'a RouteTable,
    generic: &GenericArgs,
) -> Effective<'a> {
    let unchanged = Effective {
        route: resolved.route,
        controller: resolved.route.controller,
        help_requested: false,
    };

    if resolved.route_id != HELP_ROUTE && !generic.help {
        return unchanged;
    }

    let help_route = match routes.get(HELP_ROUTE) {
        Some(route) => route,
        None => return unchanged,
    };

    let topic = help_topic(&generic.positional, routes);
    let route = routes.find_by_alias(topic).unwrap_or(help_route);

    Effective {
        route,
        controller: help_route.controller,
        help_requested: true,
    }
}
