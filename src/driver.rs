//! Driver program synthesis
//!
//! Deterministically assembles the Fortran program that registers and runs
//! every discovered test routine against the FRUIT runtime. Emission order is
//! fixed: program header, dependency imports, framework init, global setup,
//! named setups, test registrations, summary, finalize, named teardowns,
//! global teardown, program end. The global setup opens the setup phase and
//! named setups follow; teardown mirrors that, named teardowns first.

use clap::ValueEnum;

use crate::artifacts::ArtifactSet;
use crate::scan::USE_KEYWORD;

/// The framework module every driver imports.
const FRAMEWORK_MODULE: &str = "fruit";

/// Report format requested on the command line.
///
/// `junit` reuses the plain initialization: the structured report is produced
/// downstream by the log converter, never by the framework itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    None,
    Junit,
    Xml,
}

/// Builds the driver source for one invocation.
pub struct DriverSynthesizer {
    program_name: String,
    format: ReportFormat,
    filter: Option<String>,
}

impl DriverSynthesizer {
    pub fn new(program_name: &str, format: ReportFormat) -> Self {
        Self {
            program_name: program_name.to_string(),
            format,
            filter: None,
        }
    }

    /// Restrict the driver to the single named test routine. A filter that
    /// matches nothing yields a driver with no tests, which is not an error.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Emit the complete driver program text.
    pub fn synthesize(&self, artifacts: &ArtifactSet) -> String {
        let mut out = String::new();

        out.push_str(&format!("program {}\n", self.program_name));
        out.push_str(&format!("  {USE_KEYWORD} {FRAMEWORK_MODULE}\n"));
        for module in artifacts.unique_modules() {
            out.push_str(&format!("  {USE_KEYWORD} {module}\n"));
        }

        let init = match self.format {
            ReportFormat::Xml => "init_fruit_xml",
            ReportFormat::None | ReportFormat::Junit => "init_fruit",
        };
        out.push_str(&format!("  call {init}\n"));

        if artifacts.has_global_setup {
            out.push_str("  call setup\n");
        }
        for setup in &artifacts.setups {
            out.push_str(&format!("  call {setup}\n"));
        }

        for test in self.selected_tests(artifacts) {
            // The routine itself plus its name, so reports can refer to the
            // test case by name.
            out.push_str(&format!("  call run_test_case({test}, \"{test}\")\n"));
        }

        let summary = match self.format {
            ReportFormat::Xml => "fruit_summary_xml",
            ReportFormat::None | ReportFormat::Junit => "fruit_summary",
        };
        out.push_str(&format!("  call {summary}\n"));
        out.push_str("  call fruit_finalize\n");

        for teardown in &artifacts.teardowns {
            out.push_str(&format!("  call {teardown}\n"));
        }
        if artifacts.has_global_teardown {
            out.push_str("  call teardown\n");
        }

        out.push_str(&format!("end program {}\n", self.program_name));
        out
    }

    fn selected_tests<'a>(&self, artifacts: &'a ArtifactSet) -> Vec<&'a str> {
        let unique = artifacts.unique_tests();
        match &self.filter {
            Some(name) => unique.into_iter().filter(|test| *test == name.as_str()).collect(),
            None => unique,
        }
    }
}
