// src/cli/mod.rs

pub mod catalog;
pub mod dispatcher;
pub mod handlers;
pub mod help;
pub mod interactive;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use std::io::{self, Write};

use crate::{
    constants::BIN_NAME,
    core::{
        registry::Registry,
        switches::{self, ResolvedArgs},
    },
    models::{Options, Outcome},
    system::http::HttpError,
};
use dispatcher::{Dispatch, DispatchError};
use handlers::Invocation;

/// evrythng: a command-line client for the EVRYTHNG platform REST API.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about)]
// Help is rendered from the registry, so clap's own flag and subcommand are off.
#[command(disable_help_flag = true, disable_help_subcommand = true)]
pub struct Cli {
    /// Resource group, operation tokens and switches, in any order after the group.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Runs one complete command line: switches, dispatch, then the operation.
pub async fn run(argv: &[String], registry: &Registry, inv: &mut Invocation<'_>) -> Result<Outcome> {
    if matches!(argv.first().map(String::as_str), None | Some("--help" | "-h")) {
        help::print_general(registry, inv.out)?;
        return Ok(Outcome::Completed(Value::Null));
    }

    let ResolvedArgs { args, options } = switches::apply(argv)?;
    log::debug!("Positional arguments: {:?}", args);

    match dispatcher::identify(registry, &args, options.match_context())? {
        Dispatch::Interactive => Ok(Outcome::Interactive),
        Dispatch::Operation { operation, .. } => {
            let rest = args.get(1..).unwrap_or_default();
            handlers::execute(operation, rest, &options, inv).await
        }
    }
}

/// Prints an error the way the command line reports it and returns the exit code.
///
/// Unknown commands print the general help and syntax errors print the group
/// usage; both count as success.
pub fn report(error: &anyhow::Error, registry: &Registry, settings: &Options, out: &mut dyn Write) -> io::Result<u8> {
    if let Some(dispatch) = error.downcast_ref::<DispatchError>() {
        match dispatch {
            DispatchError::UnknownCommand(command) => {
                if !command.is_empty() {
                    writeln!(out, "\n{}", dispatch)?;
                }
                help::print_general(registry, out)?;
            }
            DispatchError::Syntax { .. } => writeln!(out, "\n{}", dispatch)?,
        }
        return Ok(0);
    }

    if settings.error_detail {
        if let Some((status, body)) = error.downcast_ref::<HttpError>().and_then(HttpError::api_body) {
            let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            eprintln!("\n{} ({}):\n{}", "API Error".red().bold(), status, pretty);
        } else {
            eprintln!("\n{}: {:?}", "Error".red().bold(), error);
        }
    } else {
        eprintln!("\n{}: {}", "Error".red().bold(), error);
    }
    Ok(1)
}
