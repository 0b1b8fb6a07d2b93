// src/bin/evrythng.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use evrythng::{
    cli::{self, Cli, catalog, handlers::Invocation, interactive},
    constants::BIN_NAME,
    core::{paths, registry::Registry},
    models::{LogLevel, Outcome},
    state::ConfigState,
    system::prompt::TerminalPrompt,
};
use std::io::{self, Write};
use std::process::ExitCode;

/// Info records are the CLI's progress notes and print as bare lines.
fn init_logging(level: LogLevel) {
    let default_filter = format!("{}={}", BIN_NAME, level.as_filter());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            if record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "[{}] {}", record.level(), record.args())
            }
        })
        .init();
}

fn load_config() -> Result<ConfigState> {
    let path = paths::get_config_path()?;
    Ok(ConfigState::load(path)?)
}

/// The main entry point of the `evrythng` application.
/// It loads the configuration, sets up logging, runs the command line and
/// performs centralized error handling.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.options.log_level);

    let registry = match catalog::builtin_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let code = run_cli(&cli.args, &registry, &mut config).await;

    match config.persist() {
        Ok(true) => log::debug!("Saved configuration to {}", config.path().display()),
        Ok(false) => {}
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::from(code)
}

/// Runs the command line, then the interactive loop if it was requested.
async fn run_cli(argv: &[String], registry: &Registry, config: &mut ConfigState) -> u8 {
    let prompt = TerminalPrompt;
    let mut stdout = io::stdout();

    let result = {
        let mut inv = Invocation {
            config: &mut *config,
            prompt: &prompt,
            out: &mut stdout,
        };
        match cli::run(argv, registry, &mut inv).await {
            Ok(Outcome::Interactive) => {
                let stdin = io::stdin();
                interactive::run_loop(&mut stdin.lock(), registry, &mut inv).await
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    };

    match result {
        Ok(()) => 0,
        Err(error) => cli::report(&error, registry, &config.options, &mut stdout).unwrap_or(1),
    }
}
