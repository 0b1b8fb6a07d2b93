// src/cli/interactive.rs

//! The `repl` loop. Every line goes through the same pipeline as argv, with
//! its own switches.

use anyhow::Result;
use colored::Colorize;
use std::io::BufRead;

use super::handlers::Invocation;
use crate::{constants::BIN_NAME, core::registry::Registry, models::Outcome};

/// Reads command lines until `exit`, `quit` or end of input.
pub async fn run_loop(input: &mut dyn BufRead, registry: &Registry, inv: &mut Invocation<'_>) -> Result<()> {
    writeln!(inv.out, "\nType a command without '{}', or 'exit' to leave.", BIN_NAME)?;

    loop {
        write!(inv.out, "{}> ", BIN_NAME.cyan())?;
        inv.out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(inv.out)?;
            return Ok(());
        }

        let Some(tokens) = shlex::split(line.trim()) else {
            log::error!("Unbalanced quotes in '{}'", line.trim());
            continue;
        };
        match tokens.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => return Ok(()),
            Some(_) => {}
        }

        match super::run(&tokens, registry, inv).await {
            Ok(Outcome::Interactive) => writeln!(inv.out, "Already in interactive mode.")?,
            Ok(_) => {}
            Err(error) => {
                let settings = inv.config.options.clone();
                super::report(&error, registry, &settings, inv.out)?;
            }
        }
    }
}
