// src/cli/handlers/options.rs

use anyhow::{Result, bail};
use colored::Colorize;
use serde_json::{Value, json};

use super::Invocation;
use crate::{
    constants::MAX_PER_PAGE,
    models::{LogLevel, Options, Outcome},
};

/// Option names as typed on the command line, with their accepted states.
pub static OPTION_HELP: &[(&str, &str)] = &[
    ("errorDetail", "true|false  Print the full API error body."),
    ("noConfirm", "true|false  Skip the confirmation before mutating requests."),
    ("showHttp", "true|false  Echo each request and response."),
    ("logLevel", "info|error  Hide informational output with 'error'."),
    ("defaultPerPage", "1-100       Page size of list requests."),
];

fn option_names() -> Vec<&'static str> {
    OPTION_HELP.iter().map(|(name, _)| *name).collect()
}

fn as_json(options: &Options) -> Value {
    json!({
        "errorDetail": options.error_detail,
        "noConfirm": options.no_confirm,
        "showHttp": options.show_http,
        "logLevel": options.log_level.as_filter(),
        "defaultPerPage": options.default_per_page,
    })
}

fn parse_bool(option: &str, state: &str) -> Result<bool> {
    match state {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Option '{}' must be 'true' or 'false'", option),
    }
}

/// `options list`
pub fn list(inv: &mut Invocation<'_>) -> Result<Outcome> {
    let current = as_json(&inv.config.options);
    writeln!(inv.out)?;
    for name in option_names() {
        let value = current.get(name).cloned().unwrap_or(Value::Null);
        writeln!(inv.out, "{}: {}", name.cyan(), value)?;
    }
    Ok(Outcome::Completed(current))
}

/// `options $option $state`
pub fn set(args: &[String], inv: &mut Invocation<'_>) -> Result<Outcome> {
    let option = args.first().map(String::as_str).unwrap_or_default();
    let state = args.get(1).map(String::as_str).unwrap_or_default();

    match option {
        "errorDetail" => inv.config.options.error_detail = parse_bool(option, state)?,
        "noConfirm" => inv.config.options.no_confirm = parse_bool(option, state)?,
        "showHttp" => inv.config.options.show_http = parse_bool(option, state)?,
        "logLevel" => {
            inv.config.options.log_level = match state {
                "info" => LogLevel::Info,
                "error" => LogLevel::Error,
                _ => bail!("Option 'logLevel' must be 'info' or 'error'"),
            }
        }
        "defaultPerPage" => {
            let per_page = state.parse::<u32>().ok().filter(|n| (1..=MAX_PER_PAGE).contains(n));
            let Some(per_page) = per_page else {
                bail!("Option 'defaultPerPage' must be a number between 1 and {}", MAX_PER_PAGE);
            };
            inv.config.options.default_per_page = per_page;
        }
        _ => bail!(
            "Unknown option '{}'. Choose from: {}",
            option,
            option_names().join(", ")
        ),
    }

    writeln!(inv.out, "\nSet option '{}' to '{}'", option, state)?;
    Ok(Outcome::Completed(as_json(&inv.config.options)))
}
