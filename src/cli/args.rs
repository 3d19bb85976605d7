//! Two-pass argument parsing
//!
//! The route is only known after the command word has been resolved, so the
//! argument vector is parsed twice:
//!
//! 1. [`parse_generic`] understands nothing but `--help`/`-h` and collects
//!    positional tokens. Its result only feeds help disambiguation.
//! 2. [`parse`] re-parses the whole vector with the effective route's
//!    [`ArgSchema`]. Its [`ParsedArgs`] is what controllers receive.
//!
//! Both passes are permissive: flags the schema does not declare are split
//! off before clap sees the tokens and kept in [`ParsedArgs::unknown`]. An
//! unknown flag without an inline `=value` takes the next token as its value
//! unless that token starts with `-`.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::slice::Iter;

use clap::{Arg, ArgAction, Command};
use thiserror::Error;

/// Clap ID of the catch-all positional argument
const POSITIONAL: &str = "positional";

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("Failed to parse arguments: {0}")]
    Invalid(#[from] clap::Error),
}

/// How an option consumes values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Boolean switch
    Flag,
    /// Single string value; the last occurrence wins
    Text,
    /// Repeatable string value, collected in invocation order
    List,
}

impl OptionKind {
    fn takes_value(self) -> bool {
        !matches!(self, OptionKind::Flag)
    }
}

/// One option in a route's schema. `name` doubles as the long flag.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub short: Option<char>,
    pub kind: OptionKind,
    pub help: &'static str,
}

impl OptionSpec {
    pub const fn flag(name: &'static str, short: Option<char>, help: &'static str) -> Self {
        Self { name, short, kind: OptionKind::Flag, help }
    }

    pub const fn text(name: &'static str, short: Option<char>, help: &'static str) -> Self {
        Self { name, short, kind: OptionKind::Text, help }
    }

    pub const fn list(name: &'static str, short: Option<char>, help: &'static str) -> Self {
        Self { name, short, kind: OptionKind::List, help }
    }
}

/// Argument schema for a route
#[derive(Debug, Clone, Copy)]
pub struct ArgSchema {
    pub options: &'static [OptionSpec],
    /// Usage label for positional arguments after the command word
    pub positional: Option<&'static str>,
}

impl ArgSchema {
    fn find_long(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    fn find_short(&self, c: char) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.short == Some(c))
    }

    /// Compiles the schema into a clap command
    fn command(&self) -> Command {
        let mut cmd = Command::new("kanbn")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .arg(Arg::new(POSITIONAL).num_args(1..).action(ArgAction::Append));

        for spec in self.options {
            let mut arg = Arg::new(spec.name).long(spec.name);
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }

            arg = match spec.kind {
                OptionKind::Flag => arg.action(ArgAction::Count),
                OptionKind::Text | OptionKind::List => arg
                    .action(ArgAction::Append)
                    .num_args(0..=1)
                    .default_missing_value(""),
            };

            cmd = cmd.arg(arg);
        }

        cmd
    }
}

/// Schema of the generic first pass
const GENERIC_SCHEMA: ArgSchema = ArgSchema {
    options: &[OptionSpec::flag("help", Some('h'), "Show help")],
    positional: None,
};

/// A parsed option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

/// A flag the schema does not declare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlag {
    pub name: String,
    pub value: Option<String>,
}

/// Result of the route-specific pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: BTreeMap<&'static str, ArgValue>,
    positional: Vec<String>,
    unknown: Vec<UnknownFlag>,
}

impl ParsedArgs {
    /// Returns true if a boolean option was given
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Flag(true)))
    }

    /// Returns a string option's value
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a repeatable option's values in invocation order
    pub fn list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ArgValue::List(values)) => values,
            _ => &[],
        }
    }

    /// Returns positional tokens, starting with the command word
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Returns the first positional token after the command word
    pub fn operand(&self) -> Option<&str> {
        self.positional.get(1).map(String::as_str)
    }

    /// Returns flags that the schema does not declare
    pub fn unknown(&self) -> &[UnknownFlag] {
        &self.unknown
    }
}

/// Result of the generic first pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericArgs {
    pub help: bool,
    pub positional: Vec<String>,
}

/// First pass: detects `--help`/`-h` and collects positional tokens.
///
/// `h` anywhere in a short cluster (`-ih`) counts as a help request even
/// when the other characters are unknown to this pass.
pub fn parse_generic(argv: &[String]) -> Result<GenericArgs, ArgsError> {
    let parsed = parse(argv, &GENERIC_SCHEMA)?;

    let help = parsed.flag("help")
        || argv
            .iter()
            .take_while(|token| token.as_str() != "--")
            .filter_map(|token| short_cluster(token))
            .any(|shorts| shorts.contains('h'));

    Ok(GenericArgs {
        help,
        positional: parsed.positional,
    })
}

/// Returns the characters of a `-abc` token, without any inline `=value`
fn short_cluster(token: &str) -> Option<&str> {
    let shorts = token.strip_prefix('-').filter(|s| !s.starts_with('-'))?;
    let shorts = shorts.split('=').next().unwrap_or(shorts);
    (!shorts.is_empty()).then_some(shorts)
}

/// Second pass: parses the full argument vector against a route's schema
pub fn parse(argv: &[String], schema: &ArgSchema) -> Result<ParsedArgs, ArgsError> {
    let (known, unknown) = partition(argv, schema);
    let matches = schema.command().try_get_matches_from(known)?;

    let mut values = BTreeMap::new();
    for spec in schema.options {
        let value = match spec.kind {
            OptionKind::Flag => Some(ArgValue::Flag(matches.get_count(spec.name) > 0)),
            OptionKind::Text => matches
                .get_many::<String>(spec.name)
                .and_then(|values| values.last())
                .map(|value| ArgValue::Text(value.clone())),
            OptionKind::List => Some(ArgValue::List(
                matches
                    .get_many::<String>(spec.name)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            )),
        };

        if let Some(value) = value {
            values.insert(spec.name, value);
        }
    }

    let positional = matches
        .get_many::<String>(POSITIONAL)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(ParsedArgs {
        values,
        positional,
        unknown,
    })
}

/// Result of classifying a `-abc` token
enum ShortCluster {
    /// Every character is declared; `wants_value` if the last one takes a
    /// value from the next token
    Known { wants_value: bool },
    Unknown,
}

fn classify_shorts(shorts: &str, schema: &ArgSchema) -> ShortCluster {
    for (pos, c) in shorts.char_indices() {
        match schema.find_short(c) {
            None => return ShortCluster::Unknown,
            Some(spec) if spec.kind.takes_value() => {
                let inline = pos + c.len_utf8() < shorts.len();
                return ShortCluster::Known { wants_value: !inline };
            }
            Some(_) => {}
        }
    }
    ShortCluster::Known { wants_value: false }
}

/// Takes the next token as a value unless it looks like a flag
fn take_value(tokens: &mut Peekable<Iter<'_, String>>) -> Option<String> {
    tokens
        .next_if(|t| !t.starts_with('-') || t.as_str() == "-")
        .cloned()
}

/// Splits tokens into those clap should parse and undeclared flags
fn partition(argv: &[String], schema: &ArgSchema) -> (Vec<String>, Vec<UnknownFlag>) {
    let mut known = Vec::with_capacity(argv.len());
    let mut unknown = Vec::new();
    let mut tokens = argv.iter().peekable();

    while let Some(token) = tokens.next() {
        if token == "--" {
            known.push(token.clone());
            known.extend(tokens.cloned());
            break;
        }

        if let Some(long) = token.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };

            match schema.find_long(name) {
                Some(spec) if spec.kind.takes_value() => {
                    known.push(token.clone());
                    if inline.is_none() {
                        known.extend(take_value(&mut tokens));
                    }
                }
                Some(_) if inline.is_none() => known.push(token.clone()),
                _ => unknown.push(UnknownFlag {
                    name: name.to_string(),
                    value: match inline {
                        Some(value) => Some(value.to_string()),
                        None => take_value(&mut tokens),
                    },
                }),
            }
        } else if let Some(shorts) = token.strip_prefix('-').filter(|s| !s.is_empty()) {
            match classify_shorts(shorts, schema) {
                ShortCluster::Known { wants_value } => {
                    known.push(token.clone());
                    if wants_value {
                        known.extend(take_value(&mut tokens));
                    }
                }
                ShortCluster::Unknown => unknown.push(UnknownFlag {
                    name: shorts.to_string(),
                    value: take_value(&mut tokens),
                }),
            }
        } else {
            known.push(token.clone());
        }
    }

    (known, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INIT: ArgSchema = ArgSchema {
        options: &[
            OptionSpec::flag("interactive", Some('i'), "Interactive mode"),
            OptionSpec::text("name", Some('n'), "Board name"),
            OptionSpec::text("description", Some('d'), "Board description"),
            OptionSpec::list("column", Some('c'), "Column name"),
        ],
        positional: None,
    };

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn generic_pass_detects_short_and_long_help() {
        for flag in ["-h", "--help"] {
            let generic = parse_generic(&argv(&["add", flag])).unwrap();
            assert!(generic.help, "{} should set help", flag);
            assert_eq!(generic.positional, vec!["add"]);
        }
    }

    #[test]
    fn generic_pass_ignores_other_flags() {
        let generic = parse_generic(&argv(&[
            "init", "-n", "test123", "--weird", "-c", "Column 1",
        ]))
        .unwrap();

        assert!(!generic.help);
        assert_eq!(generic.positional, vec!["init"]);
    }

    #[test]
    fn generic_pass_detects_help_in_cluster() {
        let generic = parse_generic(&argv(&["init", "-ih"])).unwrap();
        assert!(generic.help);
        assert_eq!(generic.positional, vec!["init"]);

        let generic = parse_generic(&argv(&["init", "-i", "--", "-h"])).unwrap();
        assert!(!generic.help);
    }

    #[test]
    fn generic_pass_keeps_positional_order() {
        let generic = parse_generic(&argv(&["help", "add", "archive"])).unwrap();
        assert!(!generic.help);
        assert_eq!(generic.positional, vec!["help", "add", "archive"]);
    }

    #[test]
    fn route_pass_reads_schema_options() {
        let parsed = parse(
            &argv(&[
                "init",
                "-n",
                "test123",
                "-d",
                "Test description",
                "-c",
                "Column 1",
                "-c",
                "Column 2",
            ]),
            &INIT,
        )
        .unwrap();

        assert_eq!(parsed.text("name"), Some("test123"));
        assert_eq!(parsed.text("description"), Some("Test description"));
        assert_eq!(parsed.list("column"), ["Column 1", "Column 2"]);
        assert!(!parsed.flag("interactive"));
        assert_eq!(parsed.positional(), ["init"]);
        assert!(parsed.unknown().is_empty());
    }

    #[test]
    fn long_options_with_inline_values() {
        let parsed = parse(
            &argv(&["init", "--name=Board", "--column=A", "--interactive"]),
            &INIT,
        )
        .unwrap();

        assert_eq!(parsed.text("name"), Some("Board"));
        assert_eq!(parsed.list("column"), ["A"]);
        assert!(parsed.flag("interactive"));
    }

    #[test]
    fn last_text_value_wins() {
        let parsed = parse(&argv(&["init", "-n", "first", "-n", "second"]), &INIT).unwrap();
        assert_eq!(parsed.text("name"), Some("second"));
    }

    #[test]
    fn missing_text_value_is_empty() {
        let parsed = parse(&argv(&["init", "-n"]), &INIT).unwrap();
        assert_eq!(parsed.text("name"), Some(""));

        let parsed = parse(&argv(&["init", "--name", "-i"]), &INIT).unwrap();
        assert_eq!(parsed.text("name"), Some(""));
        assert!(parsed.flag("interactive"));
    }

    #[test]
    fn absent_options_have_defaults() {
        let parsed = parse(&argv(&["init"]), &INIT).unwrap();
        assert_eq!(parsed.text("name"), None);
        assert!(parsed.list("column").is_empty());
        assert!(!parsed.flag("interactive"));
        assert_eq!(parsed.operand(), None);
    }

    #[test]
    fn unknown_flags_are_retained() {
        let parsed = parse(
            &argv(&["init", "--color=red", "--size", "big", "-z", "-n", "Board"]),
            &INIT,
        )
        .unwrap();

        assert_eq!(parsed.text("name"), Some("Board"));
        assert_eq!(
            parsed.unknown(),
            [
                UnknownFlag {
                    name: "color".to_string(),
                    value: Some("red".to_string()),
                },
                UnknownFlag {
                    name: "size".to_string(),
                    value: Some("big".to_string()),
                },
                UnknownFlag {
                    name: "z".to_string(),
                    value: None,
                },
            ]
        );
        assert_eq!(parsed.positional(), ["init"]);
    }

    #[test]
    fn boolean_with_inline_value_is_unknown() {
        let parsed = parse(&argv(&["init", "--interactive=yes"]), &INIT).unwrap();
        assert!(!parsed.flag("interactive"));
        assert_eq!(parsed.unknown()[0].value.as_deref(), Some("yes"));
    }

    #[test]
    fn short_clusters() {
        let parsed = parse(&argv(&["init", "-in", "Board"]), &INIT).unwrap();
        assert!(parsed.flag("interactive"));
        assert_eq!(parsed.text("name"), Some("Board"));

        let parsed = parse(&argv(&["init", "-nBoard"]), &INIT).unwrap();
        assert_eq!(parsed.text("name"), Some("Board"));
    }

    #[test]
    fn interleaved_positionals() {
        const SCHEMA: ArgSchema = ArgSchema {
            options: &[OptionSpec::text("column", Some('c'), "Column")],
            positional: Some("<task>"),
        };
        let schema = SCHEMA;

        let parsed = parse(&argv(&["restore", "-c", "Done", "my-task"]), &schema).unwrap();
        assert_eq!(parsed.positional(), ["restore", "my-task"]);
        assert_eq!(parsed.operand(), Some("my-task"));
        assert_eq!(parsed.text("column"), Some("Done"));
    }

    #[test]
    fn route_pass_sees_help_as_unknown_when_undeclared() {
        let parsed = parse(&argv(&["init", "--help"]), &INIT).unwrap();
        assert_eq!(parsed.unknown()[0].name, "help");
    }
}
