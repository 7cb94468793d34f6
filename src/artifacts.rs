//! Discovered test artifacts
//!
//! The scanner appends into one shared [`ArtifactSet`]; once driver synthesis
//! begins the set is read-only. Raw entries keep discovery order because the
//! driver must invoke named setup and teardown routines exactly in the order
//! they were found.

/// Kind of a discovered routine, classified from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    /// The routine named exactly `setup`, run once per session.
    GlobalSetup,
    /// The routine named exactly `teardown`, run once per session.
    GlobalTeardown,
    /// A `setup_*` / `*_setup` routine, run in discovery order.
    NamedSetup,
    /// A `teardown_*` / `*_teardown` routine, run in discovery order.
    NamedTeardown,
    /// A `test_*` routine.
    Test,
}

/// The aggregate of everything discovered across all scanned sources.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    /// Module names in discovery order, possibly repeated across files.
    pub modules: Vec<String>,
    /// Named setup routines, discovery order.
    pub setups: Vec<String>,
    /// Named teardown routines, discovery order.
    pub teardowns: Vec<String>,
    /// Test routines, discovery order. May contain duplicates: an
    /// `end subroutine test_x` line matches the same pattern as the
    /// declaration it closes.
    pub tests: Vec<String>,
    pub has_global_setup: bool,
    pub has_global_teardown: bool,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one module dependency.
    pub fn record_module(&mut self, name: &str) {
        self.modules.push(name.to_string());
    }

    /// Record one classified routine.
    ///
    /// A second global `setup` or `teardown` is a warning, not an error: the
    /// flag stays set once, and the duplicate symbol is left for the build
    /// step to reject.
    pub fn record_routine(&mut self, name: &str, kind: RoutineKind) {
        match kind {
            RoutineKind::GlobalSetup => {
                if self.has_global_setup {
                    tracing::warn!("multiple global setup routines found; only one will link");
                }
                self.has_global_setup = true;
            }
            RoutineKind::GlobalTeardown => {
                if self.has_global_teardown {
                    tracing::warn!("multiple global teardown routines found; only one will link");
                }
                self.has_global_teardown = true;
            }
            RoutineKind::NamedSetup => self.setups.push(name.to_string()),
            RoutineKind::NamedTeardown => self.teardowns.push(name.to_string()),
            RoutineKind::Test => self.tests.push(name.to_string()),
        }
    }

    /// Module names sorted and deduplicated. Declaration order across files
    /// is not meaningful, and a repeated `use` line is illegal in the driver.
    pub fn unique_modules(&self) -> Vec<&str> {
        let mut modules: Vec<&str> = self.modules.iter().map(String::as_str).collect();
        modules.sort_unstable();
        modules.dedup();
        modules
    }

    /// Test names deduplicated, first-seen order preserved.
    pub fn unique_tests(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for test in &self.tests {
            if !seen.contains(&test.as_str()) {
                seen.push(test);
            }
        }
        seen
    }
}
