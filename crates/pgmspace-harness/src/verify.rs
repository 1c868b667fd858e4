//! Output comparison and verification.

use serde::{Deserialize, Serialize};

/// Result of verifying a single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Name of the test case.
    pub case_name: String,
    /// Function the case exercises.
    pub function: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Expected output.
    pub expected: String,
    /// Actual output from the word-parallel routine.
    pub actual: String,
    /// Diff if the case failed.
    pub diff: Option<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total,
            passed,
            failed: total - passed,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Render a diff between expected and actual output.
///
/// Byte-array outputs are compared element by element so the first differing
/// index is visible; anything else falls back to a line diff.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::from("--- expected\n+++ actual\n");
    if let (Some(e), Some(a)) = (byte_list(expected), byte_list(actual)) {
        match e.iter().zip(&a).position(|(x, y)| x != y) {
            Some(i) => out.push_str(&format!("@@ byte {i} @@\n-{}\n+{}\n", e[i], a[i])),
            None => out.push_str(&format!("@@ length @@\n-{}\n+{}\n", e.len(), a.len())),
        }
        return out;
    }
    for (i, (e, a)) in expected.lines().zip(actual.lines()).enumerate() {
        if e != a {
            out.push_str(&format!("@@ line {} @@\n-{e}\n+{a}\n", i + 1));
        }
    }
    if expected.lines().count() != actual.lines().count() {
        out.push_str(&format!("-{expected}\n+{actual}\n"));
    }
    out
}

/// Parses the trailing `[1, 2, 3]` of an output, if any.
fn byte_list(s: &str) -> Option<Vec<&str>> {
    let start = s.find('[')?;
    let inner = s[start..].strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
}
