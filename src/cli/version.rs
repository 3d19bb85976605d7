//! `version` command

use anyhow::Result;

use super::args::{ArgSchema, OptionSpec};
use super::routes::Invocation;

pub const SCHEMA: ArgSchema = ArgSchema {
    options: &[OptionSpec::flag("json", None, "Print version information as JSON")],
    positional: None,
};

pub fn run(inv: &Invocation<'_>) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if inv.args.flag("json") || inv.output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": version,
            })
        );
    } else {
        println!("kanbn v{}", version);
    }

    Ok(())
}
