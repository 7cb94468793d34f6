//! Lexical artifact scanner
//!
//! Discovery is a line-oriented pattern scan, not a Fortran parse. Each line
//! is classified independently by a small set of composable predicates, so a
//! new naming convention is one more predicate rather than a parser change.
//! The trade-off is known noise: an `end subroutine test_x` line matches the
//! same pattern as the declaration it closes, which is why test artifacts are
//! deduplicated at synthesis time.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::artifacts::{ArtifactSet, RoutineKind};

/// Errors that abort a scan (and with it the whole run).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read test source '{path}': not a regular file")]
    UnreadableSource { path: String },

    #[error("error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fortran keyword opening a module declaration. Rewritten to [`USE_KEYWORD`]
/// when the driver is emitted.
const MODULE_KEYWORD: &str = "module";
/// Fortran keyword declaring a dependency on a module.
pub const USE_KEYWORD: &str = "use";
/// Fortran keyword opening a routine declaration.
const ROUTINE_KEYWORD: &str = "subroutine";

/// Longest identifier prefix of `s`: letters, digits and underscores.
/// An argument list `(`, trailing comment or any other punctuation ends it.
fn identifier_prefix(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(s.len());
    &s[..end]
}

/// Match a module declaration: optional leading whitespace, the literal
/// `module` keyword, whitespace, then the module name.
pub fn module_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(MODULE_KEYWORD)?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let name = identifier_prefix(rest.trim_start());
    if name.is_empty() { None } else { Some(name) }
}

/// Match a routine declaration anywhere in the line: the word `subroutine`
/// followed by whitespace and an identifier. Word-boundary matched, so
/// `mysubroutine` does not count; `end subroutine x` deliberately does.
pub fn subroutine_name(line: &str) -> Option<&str> {
    for (idx, _) in line.match_indices(ROUTINE_KEYWORD) {
        let boundary_before = line[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_');
        if !boundary_before {
            continue;
        }
        let rest = &line[idx + ROUTINE_KEYWORD.len()..];
        if !rest.starts_with(|c: char| c.is_whitespace()) {
            continue;
        }
        let name = identifier_prefix(rest.trim_start());
        if !name.is_empty() {
            return Some(name);
        }
    }
    None
}

/// Classify a routine name by convention.
///
/// Precedence: exact global names, then the setup/teardown affixes, then the
/// `test_` prefix. `test_setup` is therefore a named setup, never a test.
pub fn classify_routine(name: &str) -> Option<RoutineKind> {
    if name == "setup" {
        Some(RoutineKind::GlobalSetup)
    } else if name == "teardown" {
        Some(RoutineKind::GlobalTeardown)
    } else if name.starts_with("setup_") || name.ends_with("_setup") {
        Some(RoutineKind::NamedSetup)
    } else if name.starts_with("teardown_") || name.ends_with("_teardown") {
        Some(RoutineKind::NamedTeardown)
    } else if name.starts_with("test_") {
        Some(RoutineKind::Test)
    } else {
        None
    }
}

/// Scan one source file, appending everything found into `artifacts`.
///
/// Fails if `path` is not a regular file; a bad input path aborts the run
/// rather than producing a driver built from partial results.
pub fn scan_file(path: &Path, artifacts: &mut ArtifactSet) -> Result<(), ScanError> {
    if !path.is_file() {
        return Err(ScanError::UnreadableSource {
            path: path.display().to_string(),
        });
    }

    let source = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "scanning");

    for line in source.lines() {
        if let Some(name) = module_name(line) {
            artifacts.record_module(name);
        } else if let Some(name) = subroutine_name(line) {
            if let Some(kind) = classify_routine(name) {
                artifacts.record_routine(name, kind);
            }
        }
    }

    Ok(())
}
