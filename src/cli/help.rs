//! Help rendering
//!
//! One controller renders help for every topic. The dispatcher passes the
//! topic as the invocation's route ID.

use anyhow::Result;

use super::args::{ArgSchema, OptionKind};
use super::routes::{Invocation, Route, RouteTable};

pub const ROUTE_ID: &str = "help";

pub const SCHEMA: ArgSchema = ArgSchema {
    options: &[],
    positional: Some("[command]"),
};

pub fn run(inv: &Invocation<'_>) -> Result<()> {
    inv.output.verbose_ctx("help", &format!("Rendering help for '{}'", inv.route_id));

    let text = match inv.routes.get(inv.route_id) {
        Some(route) if route.id != ROUTE_ID => route_help(route),
        _ => general_help(inv.routes),
    };

    if inv.output.is_json() {
        inv.output.data(&serde_json::json!({
            "topic": inv.route_id,
            "help": text,
        }));
    } else {
        print!("{}", text);
    }

    Ok(())
}

/// Lists every route in registry order
pub fn general_help(routes: &RouteTable) -> String {
    let mut text = String::from("Usage: kanbn <command> [options]\n\nCommands:\n");

    for route in routes.iter() {
        text.push_str(&format!("  {:<16} {}\n", route.aliases.join(", "), route.summary));
    }

    text.push_str("\nRun 'kanbn help <command>' or 'kanbn <command> --help' for command options.\n");
    text
}

/// Describes one route's usage and options
pub fn route_help(route: &Route) -> String {
    let mut usage = format!("Usage: kanbn {}", route.aliases.join("|"));
    if let Some(positional) = route.schema.positional {
        usage.push(' ');
        usage.push_str(positional);
    }
    usage.push_str(" [options]");

    let mut text = format!("{}\n\n{}\n\nOptions:\n", usage, route.summary);

    for spec in route.schema.options {
        let short = spec
            .short
            .map(|c| format!("-{}, ", c))
            .unwrap_or_else(|| "    ".to_string());
        let value = match spec.kind {
            OptionKind::Flag => "",
            OptionKind::Text => " <value>",
            OptionKind::List => " <value>...",
        };
        let flag = format!("{}--{}{}", short, spec.name, value);
        text.push_str(&format!("  {:<28} {}\n", flag, spec.help));
    }

    text.push_str(&format!("  {:<28} {}\n", "-h, --help", "Show this help"));
    text
}
