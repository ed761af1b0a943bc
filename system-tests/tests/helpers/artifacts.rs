// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Suite Run Artifacts
// Description: Per-test artifact directory and canonical run summary.
// Purpose: Keep the report, event log and outcome counts of each live run.
// Dependencies: system-tests, acm-check-core, serde, serde_jcs
// ============================================================================

//! ## Overview
//! A [`SuiteRun`] owns one artifact directory. Reports and event logs are
//! written as canonical JSON, and `summary.json` always lands: on an explicit
//! [`SuiteRun::pass`], or from `Drop` when the test bailed out or panicked.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use acm_check_core::CheckStatus;
use acm_check_core::RegionSource;
use acm_check_core::ResolvedRegion;
use acm_check_core::SuiteReport;
use acm_check_core::ValidationEvent;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

/// Final state of a run.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunStatus {
    /// The test reached its end.
    Passed,
    /// The test panicked.
    Panicked,
    /// The test returned early with an error.
    Incomplete,
}

/// Check tallies copied from a suite report.
#[derive(Debug, Clone, Copy, Serialize)]
struct CheckCounts {
    /// Passed checks.
    passed: usize,
    /// Checks with assertion mismatches.
    failed: usize,
    /// Checks that could not fetch the certificate.
    errored: usize,
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    /// Test function name.
    test_name: &'a str,
    /// Final state.
    status: RunStatus,
    /// Wall-clock duration.
    duration_ms: u128,
    /// Region the run used.
    region: Option<&'a str>,
    /// Where the region came from.
    region_source: Option<RegionSource>,
    /// Certificate under test.
    certificate_arn: Option<&'a str>,
    /// Check tallies, when a suite ran.
    checks: Option<CheckCounts>,
    /// Free-form outcome line.
    detail: Option<&'a str>,
    /// Files written next to the summary.
    artifacts: &'a [String],
}

/// Artifact directory and summary state for one system test.
pub struct SuiteRun {
    /// Artifact directory.
    root: PathBuf,
    /// Test function name.
    test_name: String,
    /// Start time.
    started: Instant,
    /// Region recorded for the summary.
    region: Option<ResolvedRegion>,
    /// Certificate recorded for the summary.
    certificate_arn: Option<String>,
    /// Check tallies recorded for the summary.
    checks: Option<CheckCounts>,
    /// Files written so far.
    artifacts: Vec<String>,
    /// Whether `summary.json` has been written.
    finished: bool,
}

impl SuiteRun {
    /// Creates `<run root>/<test_name>`, defaulting the run root to a stamped
    /// directory under `target/`.
    pub fn start(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let run_root = config.run_root.unwrap_or_else(|| {
            let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
            PathBuf::from("target/acm-check-system-tests").join(stamp.as_millis().to_string())
        });
        let root = run_root.join(test_name);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            test_name: test_name.to_string(),
            started: Instant::now(),
            region: None,
            certificate_arn: None,
            checks: None,
            artifacts: Vec::new(),
            finished: false,
        })
    }

    /// Records the region for the summary.
    pub fn record_region(&mut self, region: &ResolvedRegion) {
        self.region = Some(region.clone());
    }

    /// Writes `report.json` and `report.txt` and records the check tallies.
    pub fn record_report(&mut self, report: &SuiteReport) -> io::Result<()> {
        self.write("report.json", canonical(report)?)?;
        self.write("report.txt", report.render_text().into_bytes())?;
        self.certificate_arn.clone_from(&report.certificate_arn);
        self.checks = Some(CheckCounts {
            passed: report.count(CheckStatus::Passed),
            failed: report.count(CheckStatus::Failed),
            errored: report.count(CheckStatus::Errored),
        });
        Ok(())
    }

    /// Writes the captured events to `events.jsonl`, one canonical line each.
    pub fn record_events(&mut self, events: &[ValidationEvent]) -> io::Result<()> {
        let mut bytes = Vec::new();
        for event in events {
            bytes.extend(canonical(event)?);
            bytes.push(b'\n');
        }
        self.write("events.jsonl", bytes)
    }

    /// Writes a passing summary.
    pub fn pass(mut self, detail: &str) -> io::Result<()> {
        self.write_summary(RunStatus::Passed, Some(detail))
    }

    /// Writes `name` under the artifact root and lists it in the summary.
    fn write(&mut self, name: &str, bytes: Vec<u8>) -> io::Result<()> {
        fs::write(self.root.join(name), bytes)?;
        self.artifacts.push(name.to_string());
        Ok(())
    }

    /// Writes `summary.json`.
    fn write_summary(&mut self, status: RunStatus, detail: Option<&str>) -> io::Result<()> {
        self.finished = true;
        let summary = RunSummary {
            test_name: &self.test_name,
            status,
            duration_ms: self.started.elapsed().as_millis(),
            region: self.region.as_ref().map(|region| region.region.as_str()),
            region_source: self.region.as_ref().map(|region| region.source),
            certificate_arn: self.certificate_arn.as_deref(),
            checks: self.checks,
            detail,
            artifacts: &self.artifacts,
        };
        fs::write(self.root.join("summary.json"), canonical(&summary)?)
    }
}

impl Drop for SuiteRun {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let status =
            if std::thread::panicking() { RunStatus::Panicked } else { RunStatus::Incomplete };
        let _ = self.write_summary(status, None);
    }
}

/// Serializes `value` as RFC 8785 canonical JSON.
fn canonical<T: Serialize>(value: &T) -> io::Result<Vec<u8>> {
    serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))
}
