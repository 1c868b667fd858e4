//! Integration test: checked-in fixtures and captured fixtures verify cleanly.
//!
//! Run: cargo test -p pgmspace-harness --test fixture_verify_test

use std::collections::BTreeSet;
use std::path::PathBuf;

use pgmspace_core::RegionLayout;
use pgmspace_harness::capture::capture_function;
use pgmspace_harness::execute::{ORACLE_FUNCTIONS, SUPPORTED_FUNCTIONS};
use pgmspace_harness::fixtures::fixture_paths;
use pgmspace_harness::structured_log::{LogEmitter, validate_log_text};
use pgmspace_harness::verify::VerificationSummary;
use pgmspace_harness::{FixtureSet, HarnessError, TestRunner};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_all() -> Vec<FixtureSet> {
    fixture_paths(&fixture_dir())
        .expect("fixture directory")
        .iter()
        .map(|p| FixtureSet::from_file(p).expect("valid fixture"))
        .collect()
}

#[test]
fn checked_in_fixtures_pass() {
    let runner = TestRunner::new("fixture-verify", RegionLayout::ESP8266);
    let mut results = Vec::new();
    for set in load_all() {
        results.extend(runner.run(&set));
    }
    let summary = VerificationSummary::from_results(results);
    let failures: Vec<_> = summary.results.iter().filter(|r| !r.passed).collect();
    assert!(summary.all_passed(), "{failures:#?}");
    assert!(summary.total >= 30);
}

#[test]
fn checked_in_fixtures_cover_every_function() {
    let covered: BTreeSet<String> = load_all()
        .into_iter()
        .flat_map(|set| set.cases.into_iter().map(|c| c.function))
        .collect();
    for function in SUPPORTED_FUNCTIONS {
        assert!(covered.contains(*function), "no fixture case for {function}");
    }
}

#[test]
fn fixtures_are_alignment_independent_except_classify() {
    // Moving the region base by a word must not change any result that does
    // not depend on absolute addresses.
    let runner = TestRunner::new("shifted", RegionLayout::new(0x4000_0004));
    for set in load_all() {
        for result in runner.run(&set) {
            if result.function != "classify" {
                assert!(result.passed, "{result:#?}");
            }
        }
    }
}

#[test]
fn capture_write_reload_verify() {
    let dir = std::env::temp_dir().join(format!("pgmspace-capture-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    for &function in ORACLE_FUNCTIONS {
        let set = capture_function(function, RegionLayout::ESP8266, 6).unwrap();
        std::fs::write(dir.join(format!("{function}.json")), set.to_json().unwrap()).unwrap();
    }

    let mut log = LogEmitter::to_buffer("capture-verify");
    let runner = TestRunner::new("capture-verify", RegionLayout::ESP8266);
    let mut total = 0;
    for path in fixture_paths(&dir).unwrap() {
        let set = FixtureSet::from_file(&path).unwrap();
        let results = runner.run_logged(&set, &mut log).unwrap();
        assert!(results.iter().all(|r| r.passed), "{}", path.display());
        total += results.len();
    }
    let (lines, errors) = validate_log_text(log.buffered().unwrap());
    assert_eq!(lines, total);
    assert!(errors.is_empty(), "{errors:?}");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_directory_is_an_error() {
    let dir = std::env::temp_dir().join(format!("pgmspace-empty-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    assert!(matches!(fixture_paths(&dir), Err(HarnessError::NoFixtures(_))));
    std::fs::remove_dir_all(&dir).unwrap();
}
