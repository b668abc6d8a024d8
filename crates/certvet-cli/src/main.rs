//! Certvet command line tool: run CSR inspectors against request files

mod commands;
mod error;
mod logging;
mod settings;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use error::CliResult;
use settings::Settings;

use crate::logging::init_tracing;

/// Exit status for a rejected request
const EXIT_DENIED: u8 = 2;

#[derive(Parser)]
#[command(name = "certvet")]
#[command(about = "Inspect certificate signing requests against a key policy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in inspectors and their defaults
    List,

    /// Check a CSR (PEM, DER or JSON resource) against a policy
    Check {
        /// Policy file
        #[arg(short, long, default_value = "config/policy.toml")]
        policy: String,

        /// Request file
        #[arg(short, long)]
        file: String,
    },
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::List => {
            init_tracing("warn");
            commands::list::handle();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { policy, file } => {
            let settings = Settings::load(&policy)?;
            init_tracing(&settings.log.level);
            let verdict = commands::check::handle(&settings, &file)?;
            if verdict.is_pass() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_DENIED))
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
