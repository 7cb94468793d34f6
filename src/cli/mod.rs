//! CLI module for the frut test orchestrator
//!
//! frut is a single-command tool: scan the named sources, synthesize the
//! driver, build it, run it, report. The interesting work lives in the
//! library modules; this module parses arguments and maps outcomes to exit
//! codes.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. The command
//! implementation returns `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits, which keeps
//! every cleanup guard on the stack until the last moment.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::driver::ReportFormat;
use crate::version::FRUT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Zero-boilerplate test driver for FRUIT-convention Fortran unit tests
#[derive(Parser, Debug)]
#[command(name = "frut")]
#[command(version = FRUT_VERSION)]
#[command(about = "Discover, build and run FRUIT-convention Fortran unit tests", long_about = None)]
pub struct Cli {
    /// Keep the generated driver source and executable
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Report format produced by the run
    #[arg(
        short = 't',
        long = "type",
        value_enum,
        value_name = "TYPE",
        default_value_t = ReportFormat::None
    )]
    pub format: ReportFormat,

    /// Run only the named test routine
    #[arg(short = 's', long = "single", value_name = "NAME")]
    pub single: Option<String>,

    /// Launch the built executable through this command prefix
    #[arg(short = 'c', long = "run-cmd", value_name = "CMD")]
    pub run_cmd: Option<String>,

    /// Test source files or directories (directories expand one level deep)
    #[arg(value_name = "FILE|DIR", required = true)]
    pub inputs: Vec<PathBuf>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. The command
/// implementation returns `CliResult` and errors are handled here.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // -h/-V arrive here as "errors" on stdout and exit 0; genuine
            // usage errors print to stderr and exit 1, not clap's default 2.
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            process::exit(code.0);
        }
    };

    match commands::run_suite(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
