//! Integration tests for the discovery-and-synthesis pipeline
//!
//! These tests drive `aggregate` over real files in temporary directories
//! and check the driver text that `DriverSynthesizer` produces from the
//! result. Building and executing the driver needs a Fortran toolchain and
//! is exercised separately; everything up to the build is covered here.

use std::fs;
use std::path::{Path, PathBuf};

use frut::{DriverSynthesizer, ReportFormat, ScanError, aggregate};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn synthesize(inputs: &[PathBuf], filter: Option<&str>) -> String {
    let artifacts = aggregate(inputs).unwrap();
    DriverSynthesizer::new("check_all", ReportFormat::None)
        .with_filter(filter.map(str::to_string))
        .synthesize(&artifacts)
}

#[test]
fn test_duplicate_declaration_noise_collapses() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "a.f90",
        "module m\n\
         contains\n\
         subroutine test_one\n\
         end subroutine test_one\n\
         end module m\n",
    );

    let driver = synthesize(&[file], None);
    assert_eq!(driver.matches("use m\n").count(), 1);
    assert_eq!(driver.matches("run_test_case(test_one, \"test_one\")").count(), 1);
}

#[test]
fn test_shared_module_imported_once() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.f90", "module shared\nsubroutine test_a\n");
    let b = write(dir.path(), "b.f90", "module shared\nsubroutine test_b\n");

    let driver = synthesize(&[a, b], None);
    assert_eq!(driver.matches("use shared\n").count(), 1);
}

#[test]
fn test_module_imports_are_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "a.f90",
        "module zebra\nmodule apple\nsubroutine test_a\n",
    );

    let driver = synthesize(&[file], None);
    let apple = driver.find("use apple").unwrap();
    let zebra = driver.find("use zebra").unwrap();
    assert!(apple < zebra);
}

#[test]
fn test_directory_input_discovers_setup_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "checks.f90", "subroutine test_one\n");
    write(
        dir.path(),
        "setup_env.f90",
        "subroutine setup\nend subroutine setup\nsubroutine env_setup\nend subroutine env_setup\n",
    );

    let driver = synthesize(&[dir.path().to_path_buf()], None);
    assert!(driver.contains("  call setup\n"));
    assert!(driver.contains("  call env_setup\n"));
}

#[test]
fn test_setup_phase_ordering_in_driver() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "suite.f90",
        "subroutine setup\n\
         subroutine setup_db\n\
         subroutine test_query\n\
         subroutine teardown_db\n\
         subroutine teardown\n",
    );

    let driver = synthesize(&[file], None);
    let global_setup = driver.find("  call setup\n").unwrap();
    let named_setup = driver.find("  call setup_db\n").unwrap();
    let test = driver.find("run_test_case").unwrap();
    let finalize = driver.find("fruit_finalize").unwrap();
    let named_teardown = driver.find("  call teardown_db\n").unwrap();
    let global_teardown = driver.find("  call teardown\n").unwrap();

    assert!(global_setup < named_setup);
    assert!(named_setup < test);
    assert!(test < finalize);
    assert!(finalize < named_teardown);
    assert!(named_teardown < global_teardown);
}

#[test]
fn test_single_filter_selects_only_named_routine() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "suite.f90",
        "subroutine test_one\nsubroutine test_two\n",
    );

    let driver = synthesize(&[file], Some("test_two"));
    assert!(driver.contains("run_test_case(test_two, \"test_two\")"));
    assert!(!driver.contains("test_one"));
}

#[test]
fn test_single_filter_without_match_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "suite.f90", "subroutine test_one\n");

    let driver = synthesize(&[file], Some("test_missing"));
    assert!(!driver.contains("run_test_case"));
    assert!(driver.contains("program check_all"));
    assert!(driver.contains("end program check_all"));
}

#[test]
fn test_distinct_tests_produce_one_invocation_each() {
    let dir = tempfile::tempdir().unwrap();
    let source: String = (0..5)
        .map(|i| format!("subroutine test_{i}\nend subroutine test_{i}\n"))
        .collect();
    let file = write(dir.path(), "suite.f90", &source);

    let driver = synthesize(&[file], None);
    assert_eq!(driver.matches("run_test_case").count(), 5);
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "present.f90", "subroutine test_one\n");

    let inputs = vec![dir.path().join("present.f90"), dir.path().join("absent.f90")];
    let err = aggregate(&inputs).unwrap_err();
    assert!(matches!(err, ScanError::UnreadableSource { .. }));
}
