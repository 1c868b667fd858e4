//! Test execution engine.

use pgmspace_core::RegionLayout;

use crate::execute::{ExecError, Implementation, execute_case};
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};
use crate::verify::{VerificationResult, render_diff};

/// Rendered output of a case whose routine faulted.
pub const FAULT_OUTPUT: &str = "fault";

/// Runs fixture sets against the word-parallel routines.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Region placement the cases run under.
    pub layout: RegionLayout,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, layout: RegionLayout) -> Self {
        Self {
            campaign: campaign.into(),
            layout,
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| self.run_case(case))
            .collect()
    }

    /// Like [`TestRunner::run`], logging one entry per case.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mut results = Vec::with_capacity(fixture_set.cases.len());
        for case in &fixture_set.cases {
            let result = self.run_case(case);
            let offset = case
                .inputs
                .get("offset")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0) as usize;
            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Warn, Outcome::Fail)
            };
            let mut details = serde_json::json!({
                "campaign": self.campaign,
                "family": fixture_set.family,
                "case": case.name,
            });
            if let Some(diff) = &result.diff {
                details["diff"] = serde_json::Value::from(diff.as_str());
            }
            let entry = LogEntry::new("", level, "fixture_case")
                .with_stream(StreamKind::Verify)
                .with_symbol(&case.function)
                .with_alignment(offset)
                .with_outcome(outcome)
                .with_details(details);
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }

    fn run_case(&self, case: &FixtureCase) -> VerificationResult {
        let actual = match execute_case(&case.function, &case.inputs, self.layout, Implementation::WordParallel) {
            Ok(out) => out,
            Err(ExecError::Fault(_)) => String::from(FAULT_OUTPUT),
            Err(err) => format!("unsupported:{err}"),
        };
        let passed = actual == case.expected_output;
        VerificationResult {
            case_name: case.name.clone(),
            function: case.function.clone(),
            passed,
            diff: (!passed).then(|| render_diff(&case.expected_output, &actual)),
            expected: case.expected_output.clone(),
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_log::validate_log_text;

    fn fixture(cases: &str) -> FixtureSet {
        FixtureSet::from_json(&format!(
            r#"{{"version":"v1","family":"string","captured_at":"2026-10-01T00:00:00Z","cases":[{cases}]}}"#
        ))
        .expect("valid fixture json")
    }

    #[test]
    fn runner_executes_every_case() {
        let set = fixture(
            r#"{"name":"len","function":"strnlen_P","inputs":{"region":[65,66,0],"offset":3,"n":9},"expected_output":"2"},
               {"name":"copy","function":"memcpy_P","inputs":{"region":[1,2,3],"n":2,"dest_len":3},"expected_output":"[1, 2, 238]"}"#,
        );
        let results = TestRunner::new("smoke", RegionLayout::ESP8266).run(&set);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn fault_is_an_expected_output() {
        let set = fixture(
            r#"{"name":"unterminated","function":"strlen_P","inputs":{"region":[1,2,3,4]},"expected_output":"fault"}"#,
        );
        let results = TestRunner::new("fault", RegionLayout::ESP8266).run(&set);
        assert!(results[0].passed);
    }

    #[test]
    fn mismatch_carries_diff_and_unknown_function_is_unsupported() {
        let set = fixture(
            r#"{"name":"wrong","function":"strlen_P","inputs":{"region":[65,0]},"expected_output":"2"},
               {"name":"nope","function":"strtok_P","inputs":{},"expected_output":"0"}"#,
        );
        let results = TestRunner::new("neg", RegionLayout::ESP8266).run(&set);
        assert!(!results[0].passed);
        assert!(results[0].diff.as_deref().unwrap().contains("-2"));
        assert!(results[1].actual.starts_with("unsupported:"));
    }

    #[test]
    fn logged_run_emits_valid_lines() {
        let set = fixture(
            r#"{"name":"len","function":"strnlen_P","inputs":{"region":[65,0],"offset":2,"n":4},"expected_output":"1"},
               {"name":"bad","function":"strnlen_P","inputs":{"region":[65,0],"n":4},"expected_output":"7"}"#,
        );
        let mut log = LogEmitter::to_buffer("runner");
        let results = TestRunner::new("logged", RegionLayout::ESP8266)
            .run_logged(&set, &mut log)
            .unwrap();
        assert_eq!(results.len(), 2);
        let text = log.buffered().unwrap();
        let (lines, errors) = validate_log_text(text);
        assert_eq!(lines, 2);
        assert!(errors.is_empty(), "{errors:?}");
        assert!(text.contains(r#""outcome":"fail""#));
        assert!(text.contains(r#""alignment":2"#));
    }
}
