//! conform CLI: the `conform` command.

mod cli;
mod commands;
mod error;
mod git;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands, HooksCommands};
use conform_core::constants::EXIT_INFRA_ERROR;
use conform_core::errors::ConformErrorCode;

fn main() -> ExitCode {
    conform_core::tracing::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            paths,
            strict,
            format,
            principles,
            staged,
            changed_since,
            config,
            rules,
            coverage,
            threads,
            output,
            no_color,
        } => commands::validate::run(commands::validate::Args {
            paths,
            strict,
            format,
            principles,
            staged,
            changed_since,
            config,
            rules,
            coverage,
            threads,
            output,
            no_color,
        }),

        Commands::Rules {
            config,
            rules,
            json,
        } => commands::rules::run(config, rules, json),

        Commands::Init { path, force } => commands::init::run(path, force),

        Commands::Hooks { command } => match command {
            HooksCommands::Install { force } => commands::hooks::install(force),
        },

        Commands::Schema => commands::schema::run(),
    };

    match result {
        Ok(code) => exit_code(code),
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "command failed");
            eprintln!("conform: {}", e.coded_string());
            exit_code(EXIT_INFRA_ERROR)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
}
