//! Entry point and dispatch pipeline

use anyhow::Result;

use super::args;
use super::output::Output;
use super::resolve::{effective_route, resolve};
use super::routes::{Invocation, RouteTable};
use crate::storage::Config;

/// Parses the process arguments and runs the matching command
pub fn run() -> Result<()> {
    let argv: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let config = Config::load()?;
    let output = Output::new(config.global.format, config.global.verbose);
    let routes = RouteTable::builtin();

    output.verbose(&format!("Project root: {}", config.project_root.display()));

    dispatch(&argv, &routes, &config, &output)
}

/// Resolves `argv` against `routes` and invokes the controller.
///
/// Arguments are parsed twice: once with the generic schema to detect a help
/// request, then again with the schema of the effective route.
pub fn dispatch(argv: &[String], routes: &RouteTable, config: &Config, output: &Output) -> Result<()> {
    let resolved = resolve(argv, routes)?;
    output.verbose_ctx("dispatch", &format!("Resolved route '{}' from {:?}", resolved.route_id, argv));

    let generic = args::parse_generic(argv)?;
    let effective = effective_route(resolved, routes, &generic);
    if effective.help_requested {
        output.verbose_ctx("dispatch", &format!("Showing help for '{}'", effective.route.id));
    }

    let parsed = args::parse(argv, &effective.route.schema)?;
    for flag in parsed.unknown() {
        output.verbose_ctx("dispatch", &format!("Ignoring unknown option --{}", flag.name));
    }

    let invocation = Invocation {
        route_id: effective.route.id,
        argv,
        args: parsed,
        routes,
        config,
        output,
    };

    (effective.controller)(&invocation)
}
