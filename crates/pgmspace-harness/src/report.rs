//! Report generation for verification and sweep results.

use serde::{Deserialize, Serialize};

use crate::sweep::SweepReport;
use crate::verify::VerificationSummary;

/// A report combining fixture verification and, optionally, a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Region base the cases ran under.
    pub region_base: usize,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// SHA-256 of each fixture set verified, in run order.
    pub fixture_digests: Vec<String>,
    pub summary: VerificationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepReport>,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Region base: {:#x}\n", self.region_base));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        if !self.summary.results.is_empty() {
            out.push_str("| Case | Function | Status |\n");
            out.push_str("|------|----------|--------|\n");
            for r in &self.summary.results {
                let status = if r.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("| {} | {} | {} |\n", r.case_name, r.function, status));
            }
        }

        if let Some(sweep) = &self.sweep {
            out.push_str(&sweep_markdown(sweep));
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Markdown section for a sweep.
#[must_use]
pub fn sweep_markdown(sweep: &SweepReport) -> String {
    let mut out = format!(
        "\n## Differential sweep (max length {}, {} cases)\n\n",
        sweep.max_len, sweep.cases
    );
    out.push_str("| Function | Cases | Mismatches | Word loads | Reference loads |\n");
    out.push_str("|----------|-------|------------|------------|-----------------|\n");
    for f in &sweep.functions {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            f.function, f.cases, f.mismatches, f.word_loads, f.reference_loads
        ));
    }
    for m in sweep.mismatches.iter().take(20) {
        out.push_str(&format!(
            "\n- `{}` offset {} len {}: {}",
            m.function, m.offset, m.len, m.detail
        ));
    }
    if sweep.mismatches.len() > 20 {
        out.push_str(&format!("\n- ... {} more", sweep.mismatches.len() - 20));
    }
    out
}
