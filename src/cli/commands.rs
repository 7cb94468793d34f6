//! CLI command implementation
//!
//! The single command returns `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`,
//! so the workspace guard is always dropped (and its files removed) before
//! the process terminates.

use std::fs;
use std::path::Path;

use clap::CommandFactory;

use crate::aggregate::aggregate;
use crate::driver::DriverSynthesizer;
use crate::orchestrate::{Orchestrator, RunOutcome};
use crate::scan::ScanError;
use crate::workspace::Workspace;

use super::{Cli, CliError, CliResult, ExitCode};

/// Run the whole pipeline: aggregate, synthesize, build, execute, report.
pub fn run_suite(cli: Cli) -> CliResult<ExitCode> {
    let workspace = Workspace::acquire(Path::new("."), cli.keep)
        .map_err(|e| CliError::failure(format!("Error reserving working files: {}", e)))?;

    let artifacts = aggregate(&cli.inputs).map_err(scan_failure)?;
    tracing::debug!(
        tests = artifacts.unique_tests().len(),
        modules = artifacts.unique_modules().len(),
        "aggregation complete"
    );

    let driver = DriverSynthesizer::new(workspace.basename(), cli.format)
        .with_filter(cli.single)
        .synthesize(&artifacts);
    fs::write(workspace.source_path(), driver).map_err(|e| {
        CliError::failure(format!(
            "Error writing driver source '{}': {}",
            workspace.source_path().display(),
            e
        ))
    })?;

    let outcome = Orchestrator::new(&workspace, cli.format, cli.run_cmd)
        .build_and_run()
        .map_err(|e| CliError::failure(format!("Error invoking external command: {}", e)))?;

    match outcome {
        RunOutcome::Success => Ok(ExitCode::SUCCESS),
        // The framework already printed its summary; nothing to add.
        RunOutcome::TestFailure => Err(CliError::new("", ExitCode::FAILURE)),
        RunOutcome::BuildFailure(code) => Err(CliError::with_code(
            format!("Build failed for target '{}'", workspace.basename()),
            code,
        )),
        RunOutcome::ExecutionFailure(code) => {
            Err(CliError::with_code("Test program exited abnormally", code))
        }
    }
}

/// A bad source path gets the message plus usage, exit 1.
fn scan_failure(err: ScanError) -> CliError {
    let usage = Cli::command().render_usage();
    CliError::failure(format!("{err}\n\n{usage}"))
}
