//! CLI entrypoint for the pgmspace verification harness.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pgmspace_core::RegionLayout;
use pgmspace_harness::execute::ORACLE_FUNCTIONS;
use pgmspace_harness::fixtures::fixture_paths;
use pgmspace_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, StreamKind, now_utc,
};
use pgmspace_harness::verify::VerificationSummary;
use pgmspace_harness::{ConformanceReport, FixtureSet, HarnessError, TestRunner, capture, sweep};

/// Verification tooling for the pgmspace routines.
#[derive(Debug, Parser)]
#[command(name = "pgmspace-harness")]
#[command(about = "Fixture verification and differential sweeps for <pgmspace.h> routines")]
struct Cli {
    /// Region base: `esp8266`, hex (`0x4000_0000`) or decimal.
    #[arg(long, global = true, default_value = "esp8266")]
    region_base: String,
    /// Write structured JSONL logs to this path.
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the word-parallel routines against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown; JSON written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Also run a differential sweep up to this length.
        #[arg(long)]
        sweep_max_len: Option<usize>,
    },
    /// Exhaustive differential sweep against the byte oracle.
    Sweep {
        /// Longest string/copy length to sweep.
        #[arg(long, default_value_t = 16)]
        max_len: usize,
        /// Output report path (markdown; JSON written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Capture oracle behavior as fixture files.
    Capture {
        /// Output directory for fixture JSON files.
        #[arg(long)]
        output: PathBuf,
        /// Longest length to capture.
        #[arg(long, default_value_t = 12)]
        max_len: usize,
        /// Capture only this function (default: every oracle-backed one).
        #[arg(long)]
        function: Option<String>,
    },
}

fn write_report(path: &Path, report: &ConformanceReport, run_id: &str) -> Result<(), HarnessError> {
    let markdown = report.to_markdown();
    let json = report.to_json();
    let json_path = path.with_extension("json");
    std::fs::write(path, &markdown)?;
    std::fs::write(&json_path, &json)?;

    let mut index = ArtifactIndex::new(run_id);
    index
        .add(path.display().to_string(), "report_markdown", markdown.as_bytes())
        .add(json_path.display().to_string(), "report_json", json.as_bytes());
    std::fs::write(path.with_extension("artifacts.json"), index.to_json()?)?;
    eprintln!("Wrote report to {} and {}", path.display(), json_path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let layout = RegionLayout::parse(&cli.region_base).map_err(HarnessError::from)?;
    let run_id = format!("{}", std::process::id());
    let mut log = match &cli.log {
        Some(path) => Some(LogEmitter::to_file(path, &run_id)?),
        None => None,
    };

    match cli.command {
        Command::Verify {
            fixture,
            report,
            sweep_max_len,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let runner = TestRunner::new("fixture-verify", layout);
            let mut results = Vec::new();
            let mut digests = Vec::new();
            for path in fixture_paths(&fixture)? {
                let set = match FixtureSet::from_file(&path) {
                    Ok(set) => set,
                    Err(err) => {
                        eprintln!("Skipping {}: {err}", path.display());
                        continue;
                    }
                };
                digests.push(set.digest()?);
                match log.as_mut() {
                    Some(log) => results.extend(runner.run_logged(&set, log)?),
                    None => results.extend(runner.run(&set)),
                }
            }

            let sweep = match sweep_max_len {
                Some(max_len) => Some(sweep::run_sweep(layout, max_len, log.as_mut())?),
                None => None,
            };
            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("pgmspace Conformance Report"),
                region_base: layout.base(),
                timestamp: now_utc(),
                fixture_digests: digests,
                summary,
                sweep,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            if let Some(path) = report {
                write_report(&path, &report_doc, &run_id)?;
            }
            if let Some(log) = log.as_mut() {
                log.flush()?;
            }

            if !report_doc.summary.all_passed() {
                return Err(HarnessError::VerificationFailed {
                    failed: report_doc.summary.failed,
                    total: report_doc.summary.total,
                }
                .into());
            }
            if let Some(sweep) = &report_doc.sweep
                && !sweep.passed()
            {
                return Err(HarnessError::SweepMismatch(sweep.mismatches.len()).into());
            }
        }
        Command::Sweep { max_len, report } => {
            eprintln!("Sweeping lengths 0..={max_len} at region base {:#x}", layout.base());
            let result = sweep::run_sweep(layout, max_len, log.as_mut())?;
            for f in &result.functions {
                eprintln!(
                    "{:<12} cases={:<8} mismatches={:<4} loads word/reference={}/{}",
                    f.function, f.cases, f.mismatches, f.word_loads, f.reference_loads
                );
            }
            if let Some(log) = log.as_mut() {
                log.flush()?;
            }
            let mismatches = result.mismatches.len();
            if let Some(path) = report {
                let report_doc = ConformanceReport {
                    title: String::from("pgmspace Differential Sweep"),
                    region_base: layout.base(),
                    timestamp: now_utc(),
                    fixture_digests: Vec::new(),
                    summary: VerificationSummary::from_results(Vec::new()),
                    sweep: Some(result),
                };
                write_report(&path, &report_doc, &run_id)?;
            }
            if mismatches > 0 {
                return Err(HarnessError::SweepMismatch(mismatches).into());
            }
        }
        Command::Capture {
            output,
            max_len,
            function,
        } => {
            std::fs::create_dir_all(&output)?;
            let functions: Vec<&'static str> = match function.as_deref() {
                Some(name) => match ORACLE_FUNCTIONS.iter().find(|f| **f == name) {
                    Some(f) => vec![*f],
                    None => {
                        return Err(format!(
                            "no oracle for '{name}', expected one of {ORACLE_FUNCTIONS:?}"
                        )
                        .into());
                    }
                },
                None => ORACLE_FUNCTIONS.to_vec(),
            };
            for function in functions {
                let set = capture::capture_function(function, layout, max_len)?;
                let path = output.join(format!("{}.v1.json", function.to_ascii_lowercase()));
                std::fs::write(&path, set.to_json()?)?;
                if let Some(log) = log.as_mut() {
                    log.emit_entry(
                        LogEntry::new("", LogLevel::Info, "fixture_captured")
                            .with_stream(StreamKind::Capture)
                            .with_symbol(function)
                            .with_details(serde_json::json!({
                                "cases": set.cases.len(),
                                "path": path.display().to_string(),
                            })),
                    )?;
                }
                eprintln!("Captured {} cases to {}", set.cases.len(), path.display());
            }
            if let Some(log) = log.as_mut() {
                log.flush()?;
            }
        }
    }
    Ok(())
}
