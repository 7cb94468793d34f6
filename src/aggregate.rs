//! Input resolution and artifact aggregation
//!
//! Aggregation is two-pass. Pass one scans what the caller named: explicit
//! files as-is, directories expanded one level deep to their `.f90` files
//! (setup files excluded). Pass two revisits every directory the inputs
//! referenced and scans the `setup_*` convention files found directly inside
//! it, so setup files are picked up even when nobody listed them. Ordinary
//! test files are never cross-discovered beyond what the caller named.
//!
//! Directory listings are sorted, so the driver is identical across
//! platforms regardless of filesystem enumeration order.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifacts::ArtifactSet;
use crate::scan::{ScanError, scan_file};

/// Source extension recognized during directory expansion.
pub const SOURCE_EXT: &str = "f90";

/// Files named `setup_*.f90` are auto-discovered in pass two and excluded
/// from pass one.
const SETUP_FILE_PREFIX: &str = "setup_";

/// Resolve inputs, scan every resolved file, and return the aggregate.
/// Any scan failure aborts immediately; no partial results are used.
pub fn aggregate(inputs: &[PathBuf]) -> Result<ArtifactSet, ScanError> {
    let mut artifacts = ArtifactSet::new();

    for path in resolve_inputs(inputs)? {
        scan_file(&path, &mut artifacts)?;
    }

    for dir in referenced_dirs(inputs) {
        for path in setup_files_in(&dir)? {
            scan_file(&path, &mut artifacts)?;
        }
    }

    Ok(artifacts)
}

/// Flatten inputs to the ordered pass-one file list.
fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(source_files_in(input)?);
        } else {
            if !input.is_file() {
                return Err(ScanError::UnreadableSource {
                    path: input.display().to_string(),
                });
            }
            if !is_setup_file(input) {
                files.push(input.clone());
            }
        }
    }

    Ok(files)
}

/// Depth-1 listing of a directory's ordinary source files, sorted.
fn source_files_in(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    list_dir(dir, |path| has_source_ext(path) && !is_setup_file(path))
}

/// Depth-1 listing of a directory's setup convention files, sorted.
fn setup_files_in(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    list_dir(dir, |path| has_source_ext(path) && is_setup_file(path))
}

fn list_dir(dir: &Path, want: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && want(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Directories the inputs reference: a directory input contributes itself, a
/// file input its containing directory. Deduplicated and ordered.
fn referenced_dirs(inputs: &[PathBuf]) -> BTreeSet<PathBuf> {
    inputs
        .iter()
        .map(|input| {
            if input.is_dir() {
                input.clone()
            } else {
                match input.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                }
            }
        })
        .collect()
}

fn has_source_ext(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXT)
}

fn is_setup_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(SETUP_FILE_PREFIX))
}
