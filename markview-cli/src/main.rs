//! Command-line interface for markview
//! Reflows raw markup (XML, SBML, VCML, ...) and prints it indented and highlighted.
//!
//! Usage:
//!   markview [path] [--format <format>]   - Reflow a file (stdin when absent or '-')
//!   markview [path] --raw                 - Print the input exactly as received
//!
//! Settings come from the built-in defaults, then `markview.toml` in the working directory,
//! then `--config <file>`, then the individual flags.

mod error;
mod logging;
mod render;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueEnum};
use error::CliError;
use markview_config::{ColorMode, Loader, MarkviewConfig};
use markview_engine::highlight;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

const LOCAL_CONFIG: &str = "markview.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented and coloured (plain when colour is off)
    Highlight,
    /// Indented text only
    Pretty,
    TokensJson,
    SpansJson,
    LinesJson,
}

fn cli() -> Command {
    Command::new("markview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pretty-print and highlight raw markup documents")
        .arg(
            Arg::new("path")
                .help("Path to the document; reads stdin when absent or '-'")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(clap::value_parser!(OutputFormat))
                .default_value("highlight"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .help("Indent unit repeated per nesting level ('\\t' for a tab)"),
        )
        .arg(
            Arg::new("guard-literals")
                .long("guard-literals")
                .help("Do not split comments, CDATA or quoted attribute values on '><'")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("flat-declarations")
                .long("flat-declarations")
                .help("Keep <!DOCTYPE> and CDATA sections from opening a nesting level")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .help("When to colour highlight output")
                .value_parser(["auto", "always", "never"]),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Print the input unchanged instead of reflowing it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Diagnostics written to stderr")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .default_value("warn"),
        )
}

fn main() {
    let matches = cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    logging::start(logging::level(level));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let bytes = read_input(matches.get_one::<String>("path").map(String::as_str))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches.get_flag("raw") {
        return out.write_all(&bytes).map_err(CliError::Write);
    }

    // The engine accepts any text, so bad bytes never stop a render.
    let raw = String::from_utf8_lossy(&bytes);

    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or(OutputFormat::Highlight);
    let highlighted = highlight(&raw, &config.reflow.to_options());

    let rendered = match format {
        OutputFormat::Pretty => highlighted.text().to_string(),
        OutputFormat::Highlight if use_color(config.render.color) => {
            render::ansi(&highlighted.spans(), &config.render)
        }
        OutputFormat::Highlight => highlighted.text().to_string(),
        OutputFormat::TokensJson => {
            serde_json::to_string_pretty(&highlighted.tokens()).map_err(CliError::Json)?
        }
        OutputFormat::SpansJson => {
            serde_json::to_string_pretty(&highlighted.spans()).map_err(CliError::Json)?
        }
        OutputFormat::LinesJson => {
            serde_json::to_string_pretty(highlighted.document().lines())
                .map_err(CliError::Json)?
        }
    };

    if rendered.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", rendered).map_err(CliError::Write)
}

fn load_config(matches: &ArgMatches) -> Result<MarkviewConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);

    if let Some(path) = matches.get_one::<String>("config") {
        tracing::debug!(path = %path, "layering configuration file");
        loader = loader.with_file(path);
    }
    if let Some(indent) = matches.get_one::<String>("indent") {
        loader = loader.set_override("reflow.indent_unit", indent.replace("\\t", "\t"))?;
    }
    if matches.get_flag("guard-literals") {
        loader = loader.set_override("reflow.guard_literals", true)?;
    }
    if matches.get_flag("flat-declarations") {
        loader = loader.set_override("reflow.flat_declarations", true)?;
    }
    if let Some(color) = matches.get_one::<String>("color") {
        loader = loader.set_override("render.color", color.as_str())?;
    }

    Ok(loader.build()?)
}

/// The input exactly as received, for `--raw` and for decoding.
fn read_input(path: Option<&str>) -> Result<Vec<u8>, CliError> {
    let bytes = match path {
        None | Some("-") => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(CliError::Stdin)?;
            buffer
        }
        Some(path) => std::fs::read(path).map_err(|source| CliError::Read {
            path: PathBuf::from(path),
            source,
        })?,
    };
    tracing::debug!(bytes = bytes.len(), "read input");

    Ok(bytes)
}

fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn test_format_names() {
        let names: Vec<_> = OutputFormat::value_variants()
            .iter()
            .filter_map(|format| format.to_possible_value())
            .map(|value| value.get_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["highlight", "pretty", "tokens-json", "spans-json", "lines-json"]
        );
    }

    #[test]
    fn test_indent_override_reaches_reflow_options() {
        let matches = cli().get_matches_from([
            "markview",
            "--indent",
            "\\t",
            "--guard-literals",
            "--flat-declarations",
        ]);
        let config = load_config(&matches).expect("config to load");
        let options = config.reflow.to_options();
        assert_eq!(options.indent_unit, "\t");
        assert!(options.guard_literals);
        assert!(options.flat_declarations);
    }
}
