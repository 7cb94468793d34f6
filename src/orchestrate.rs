//! Build and execution orchestration
//!
//! The build step is the project's own `make`, invoked with the working
//! basename as its target; the test program is whatever that build produced.
//! Both collaborators are waited on without a timeout, one attempt each. A
//! caller-supplied launch prefix wraps the executable for remote or
//! sandboxed execution (`mpirun -np 2`, a container shim, and so on).

use std::fs::{self, File};
use std::io;
use std::process::{Command, Stdio};

use crate::driver::ReportFormat;
use crate::workspace::Workspace;

/// External build collaborator; receives the working basename as target.
const BUILD_COMMAND: &str = "make";
/// External log-to-report converter for JUnit output.
const JUNIT_CONVERTER: &str = "fruit2junit";
/// Literal the framework summary prints when an assertion failed.
const FAILURE_MARKER: &str = "Failed";

/// Exit classification of one build-and-run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Everything built, ran and passed.
    Success,
    /// The framework reported failing assertions.
    TestFailure,
    /// `make` returned non-zero; carries the build's exit code.
    BuildFailure(i32),
    /// The test program itself exited non-zero; carries its exit code.
    ExecutionFailure(i32),
}

/// Drives one build-run-report cycle over a reserved workspace.
pub struct Orchestrator<'a> {
    workspace: &'a Workspace,
    format: ReportFormat,
    run_cmd: Option<String>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(workspace: &'a Workspace, format: ReportFormat, run_cmd: Option<String>) -> Self {
        Self {
            workspace,
            format,
            run_cmd,
        }
    }

    /// Build, execute and classify. `Err` means an external command could not
    /// be spawned at all; collaborator failures come back as [`RunOutcome`].
    pub fn build_and_run(&self) -> io::Result<RunOutcome> {
        if let Some(code) = self.build()? {
            return Ok(RunOutcome::BuildFailure(code));
        }
        if let Some(code) = self.execute()? {
            return Ok(RunOutcome::ExecutionFailure(code));
        }
        self.report()
    }

    fn build(&self) -> io::Result<Option<i32>> {
        tracing::debug!(build_target = self.workspace.basename(), "building driver");
        let status = Command::new(BUILD_COMMAND)
            .arg(self.workspace.basename())
            .status()?;
        Ok(exit_code(status))
    }

    fn execute(&self) -> io::Result<Option<i32>> {
        let log = File::create(self.workspace.log_path())?;
        let executable = self.workspace.executable_path();

        let mut command = match &self.run_cmd {
            Some(prefix) => {
                let mut words = prefix.split_whitespace();
                let program = words
                    .next()
                    .ok_or_else(|| io::Error::other("empty launch command"))?;
                let mut command = Command::new(program);
                command.args(words);
                command.arg(&executable);
                command
            }
            None => Command::new(&executable),
        };

        let status = command.stdout(Stdio::from(log)).status()?;
        Ok(exit_code(status))
    }

    fn report(&self) -> io::Result<RunOutcome> {
        let log = fs::read_to_string(self.workspace.log_path())?;

        if self.format == ReportFormat::Junit {
            // The converter's report is taken as-is; only the exit status of
            // this process reflects what the log says.
            Command::new(JUNIT_CONVERTER)
                .arg(self.workspace.log_path())
                .status()?;
        } else {
            print!("{log}");
        }

        if log.contains(FAILURE_MARKER) {
            Ok(RunOutcome::TestFailure)
        } else {
            Ok(RunOutcome::Success)
        }
    }
}

/// `None` for success, the (signal-tolerant) exit code otherwise.
fn exit_code(status: std::process::ExitStatus) -> Option<i32> {
    if status.success() {
        None
    } else {
        Some(status.code().unwrap_or(1))
    }
}
