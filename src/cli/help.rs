// src/cli/help.rs

use colored::Colorize;
use std::io::{self, Write};

use super::handlers::options::OPTION_HELP;
use crate::{
    constants::{BIN_NAME, INTERACTIVE_KEYWORD},
    core::{registry::Registry, switches::SWITCH_CATALOG},
};

const EXAMPLES: &[&str] = &[
    "thngs list --per-page 10",
    "thngs UnghCKffVg8a9KwRwE5C9qBs read --field name",
    "products create '{\"name\":\"Fridge\"}'",
    "t list --filter tags=demo --to-page 3 --to-csv thngs.csv",
    "keys add prod us <API key>",
    "options showHttp true",
];

/// Prints the general help: version, usage, resource groups, switches, options and examples.
pub fn print_general(registry: &Registry, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "\n{} {}\n{}",
        BIN_NAME.bold(),
        concat!("v", env!("CARGO_PKG_VERSION")).dimmed(),
        env!("CARGO_PKG_DESCRIPTION")
    )?;

    section(out, "Usage")?;
    writeln!(out, "  {} <resource> <operation> [<switches>...]", BIN_NAME.cyan())?;
    writeln!(out, "  {} {}", BIN_NAME.cyan(), INTERACTIVE_KEYWORD)?;

    section(out, "Resources")?;
    for compiled in registry.groups() {
        let names = compiled.group.first_args.join(", ");
        writeln!(out, "  {:<26} {}", names.green(), compiled.group.about)?;
    }
    writeln!(out, "  {}", format!("Run '{} <resource>' to list its operations.", BIN_NAME).dimmed())?;

    section(out, "Switches")?;
    for switch in SWITCH_CATALOG {
        let usage = match switch.value_label {
            Some(label) => format!("{} {}", switch.name, label),
            None => switch.name.to_string(),
        };
        writeln!(out, "  {:<32} {}", usage.cyan(), switch.about)?;
    }

    section(out, "Options")?;
    for (name, about) in OPTION_HELP {
        writeln!(out, "  {:<18} {}", name.cyan(), about)?;
    }

    section(out, "Examples")?;
    for example in EXAMPLES {
        writeln!(out, "  {} {}", BIN_NAME, example)?;
    }
    writeln!(out)
}

fn section(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", title.to_uppercase().yellow().bold())
}
