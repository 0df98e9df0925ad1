//! `conform validate`.

use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use conform_analysis::reporters::{create_reporter, JsonReporter, Reporter};
use conform_analysis::scanner::expand_paths;
use conform_analysis::{ComplianceReport, ValidationScope, Validator};
use conform_core::config::{conform_config::split_list, CliOverrides, ConformConfig};
use conform_core::constants::{EXIT_CANCELLED, EXIT_FAIL, EXIT_INFRA_ERROR, EXIT_PASS};
use conform_core::errors::ReportError;
use conform_core::events::EventDispatcher;
use conform_core::traits::{Cancellable, CancellationToken};

use super::current_dir;
use crate::error::CliError;
use crate::git;

/// File name used when persisting to `output.report_dir`.
pub const REPORT_FILE_NAME: &str = "conform-report.json";

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub strict: bool,
    pub format: Option<String>,
    pub principles: Option<String>,
    pub staged: bool,
    pub changed_since: Option<String>,
    pub config: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub coverage: Option<f64>,
    pub threads: Option<usize>,
    pub output: Option<PathBuf>,
    pub no_color: bool,
}

pub fn run(args: Args) -> Result<i32, CliError> {
    let root = current_dir()?;
    let overrides = CliOverrides {
        rules_path: args.rules.as_ref().map(|p| p.display().to_string()),
        threads: args.threads,
        tool_timeout_ms: None,
        strict: args.strict.then_some(true),
        principles: args.principles.as_deref().map(split_list),
        format: args.format.clone(),
        color: args.no_color.then_some(false),
    };
    let config = ConformConfig::load_with_file(&root, args.config.as_deref(), Some(&overrides))?;

    let files = collect_files(&root, &args)?;
    let validator = Validator::from_config(&root, &config, EventDispatcher::new())?;

    let token = CancellationToken::new();
    let handler_token = token.clone();
    let handler = move || {
        if handler_token.cancel() {
            eprintln!("conform: stopping after in-flight files (Ctrl-C again to abort)");
        } else {
            std::process::exit(EXIT_CANCELLED);
        }
    };
    if let Err(e) = ctrlc::set_handler(handler) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    let scope = ValidationScope {
        file_paths: files,
        principles_to_check: config.validation.principles.iter().cloned().collect(),
        strict_mode: config.validation.effective_strict(),
        coverage: args.coverage,
    };
    let report = validator.validate_with_cancellation(scope, &token);

    let color = config.output.effective_color() && std::io::stdout().is_terminal();
    let reporter = create_reporter(config.output.effective_format(), color)?;
    print!("{}", reporter.render(&report)?);

    persist(&root, &config, args.output.as_deref(), &report)?;

    Ok(exit_code(&report))
}

/// Cancelled, then violations and gates, then tool failures.
pub(crate) fn exit_code(report: &ComplianceReport) -> i32 {
    if report.metadata.cancelled {
        EXIT_CANCELLED
    } else if !report.passed() {
        EXIT_FAIL
    } else if report.has_tool_failures() {
        EXIT_INFRA_ERROR
    } else {
        EXIT_PASS
    }
}

/// Explicit paths plus any git-derived file sets; `.` when nothing was named.
fn collect_files(root: &Path, args: &Args) -> Result<BTreeSet<PathBuf>, CliError> {
    let mut files = BTreeSet::new();
    if args.staged {
        files.extend(git::staged_files(root)?);
    }
    if let Some(rev) = &args.changed_since {
        files.extend(git::changed_since(root, rev)?);
    }
    if !args.paths.is_empty() {
        files.extend(expand_paths(&args.paths)?);
    } else if !args.staged && args.changed_since.is_none() {
        files.extend(expand_paths(&[root])?);
    }
    Ok(files)
}

/// Write the JSON report to `--output`, or into `output.report_dir`.
fn persist(
    root: &Path,
    config: &ConformConfig,
    output: Option<&Path>,
    report: &ComplianceReport,
) -> Result<(), CliError> {
    let target = match (output, config.output.report_dir.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(dir)) => root.join(dir).join(REPORT_FILE_NAME),
        (None, None) => return Ok(()),
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = JsonReporter::with_timing().render(report)?;
    std::fs::write(&target, json).map_err(|source| ReportError::Write {
        path: target.clone(),
        source,
    })?;
    tracing::info!(path = %target.display(), "report written");
    Ok(())
}
