//! Golden snapshot tests for driver synthesis
//!
//! These tests build an artifact set by hand and compare the synthesized
//! driver against inline snapshots. Emission order is a compatibility
//! surface: users' setup/teardown semantics depend on it, so any change here
//! must be reviewed and intentional.

use frut::{ArtifactSet, DriverSynthesizer, ReportFormat, RoutineKind};

fn suite_artifacts() -> ArtifactSet {
    let mut set = ArtifactSet::new();
    set.record_module("geometry");
    set.record_module("algebra");
    set.record_module("geometry");
    set.record_routine("setup", RoutineKind::GlobalSetup);
    set.record_routine("setup_grid", RoutineKind::NamedSetup);
    set.record_routine("test_area", RoutineKind::Test);
    set.record_routine("test_area", RoutineKind::Test);
    set.record_routine("test_determinant", RoutineKind::Test);
    set.record_routine("teardown_grid", RoutineKind::NamedTeardown);
    set.record_routine("teardown", RoutineKind::GlobalTeardown);
    set
}

#[test]
fn test_plain_driver_snapshot() {
    let driver = DriverSynthesizer::new("suite_driver", ReportFormat::None).synthesize(&suite_artifacts());
    insta::assert_snapshot!(driver, @r#"
    program suite_driver
      use fruit
      use algebra
      use geometry
      call init_fruit
      call setup
      call setup_grid
      call run_test_case(test_area, "test_area")
      call run_test_case(test_determinant, "test_determinant")
      call fruit_summary
      call fruit_finalize
      call teardown_grid
      call teardown
    end program suite_driver
    "#);
}

#[test]
fn test_xml_driver_snapshot() {
    let driver = DriverSynthesizer::new("suite_driver", ReportFormat::Xml).synthesize(&suite_artifacts());
    insta::assert_snapshot!(driver, @r#"
    program suite_driver
      use fruit
      use algebra
      use geometry
      call init_fruit_xml
      call setup
      call setup_grid
      call run_test_case(test_area, "test_area")
      call run_test_case(test_determinant, "test_determinant")
      call fruit_summary_xml
      call fruit_finalize
      call teardown_grid
      call teardown
    end program suite_driver
    "#);
}

#[test]
fn test_filtered_driver_snapshot() {
    let driver = DriverSynthesizer::new("suite_driver", ReportFormat::None)
        .with_filter(Some("test_determinant".to_string()))
        .synthesize(&suite_artifacts());
    insta::assert_snapshot!(driver, @r#"
    program suite_driver
      use fruit
      use algebra
      use geometry
      call init_fruit
      call setup
      call setup_grid
      call run_test_case(test_determinant, "test_determinant")
      call fruit_summary
      call fruit_finalize
      call teardown_grid
      call teardown
    end program suite_driver
    "#);
}

#[test]
fn test_empty_artifact_set_snapshot() {
    let driver = DriverSynthesizer::new("suite_driver", ReportFormat::None).synthesize(&ArtifactSet::new());
    insta::assert_snapshot!(driver, @r#"
    program suite_driver
      use fruit
      call init_fruit
      call fruit_summary
      call fruit_finalize
    end program suite_driver
    "#);
}
