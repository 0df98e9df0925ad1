use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "conform",
    about = "conform: rule-based compliance validation for changed files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate files against the configured rules
    Validate {
        /// Files or directories; directories are walked honouring .gitignore
        paths: Vec<PathBuf>,

        /// Treat every violation as blocking
        #[arg(long)]
        strict: bool,

        /// Output format: text, json or github
        #[arg(long)]
        format: Option<String>,

        /// Comma-separated principles to check (default: all)
        #[arg(long)]
        principles: Option<String>,

        /// Validate the files staged in the git index
        #[arg(long)]
        staged: bool,

        /// Validate files changed since a git revision
        #[arg(long, value_name = "REV")]
        changed_since: Option<String>,

        /// Project config file (default: ./conform.toml)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Rule file (default: .conform/rules.yaml)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Externally measured coverage percentage for the coverage gate
        #[arg(long, value_name = "PCT")]
        coverage: Option<f64>,

        /// Worker threads (0 = one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Also write the JSON report to this file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Disable ANSI colour in text output
        #[arg(long)]
        no_color: bool,
    },

    /// List the loaded rules
    Rules {
        /// Project config file (default: ./conform.toml)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Rule file (default: .conform/rules.yaml)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default conform.toml and rule file
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Manage git hooks
    Hooks {
        #[command(subcommand)]
        command: HooksCommands,
    },

    /// Print the JSON Schema of the JSON report
    Schema,
}

#[derive(Subcommand)]
pub enum HooksCommands {
    /// Install pre-commit and pre-push hooks that run conform
    Install {
        /// Overwrite existing hooks
        #[arg(long)]
        force: bool,
    },
}
