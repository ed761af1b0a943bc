// crates/acm-check-core/src/checker.rs
// ============================================================================
// Module: Certificate Checker
// Description: Fetches a certificate and runs the named validation checks.
// Purpose: Turn describe results into per-check pass/fail outcomes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`CertificateChecker`] wraps a [`CertificateDescriber`] with the
//! missing-certificate guard. [`CheckSuite`] runs the three checks
//! (`is_deployed`, `common_name_is_correct`, `sans_are_correct`) in order and
//! collects a [`SuiteReport`].
//!
//! ## Invariants
//! - Output lookup, transport errors and a missing certificate mark only the
//!   affected check as errored; the remaining checks still run.
//! - Assertion mismatches are collected, never raised.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::certificate::Certificate;
use crate::certificate::Expectations;
use crate::certificate::assert_common_name;
use crate::certificate::assert_deployed;
use crate::certificate::assert_sans;
use crate::describer::CertificateDescriber;
use crate::describer::DescribeError;
use crate::events::FetchOutcome;
use crate::events::NoopEventSink;
use crate::events::ValidationEvent;
use crate::events::ValidationEventSink;
use crate::outputs::CERTIFICATE_ARN_OUTPUT;
use crate::outputs::OutputError;
use crate::outputs::OutputSource;
use crate::region::RegionSource;
use crate::region::ResolvedRegion;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Named checks run by the suite.
///
/// # Invariants
/// - Variants are stable for report and log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    /// Certificate ARN matches the output ARN.
    IsDeployed,
    /// Domain name matches the expected common name.
    CommonNameIsCorrect,
    /// SAN set matches the expected set.
    SansAreCorrect,
}

impl CheckName {
    /// All checks in execution order.
    pub const ALL: [Self; 3] = [Self::IsDeployed, Self::CommonNameIsCorrect, Self::SansAreCorrect];

    /// Returns a stable label for the check.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IsDeployed => "is_deployed",
            Self::CommonNameIsCorrect => "common_name_is_correct",
            Self::SansAreCorrect => "sans_are_correct",
        }
    }
}

/// How many describe calls a suite run makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// One fetch per check.
    #[default]
    PerCheck,
    /// One fetch shared by all checks.
    Shared,
}

impl FetchMode {
    /// Returns a stable label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerCheck => "per_check",
            Self::Shared => "shared",
        }
    }
}

/// Final status of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// All assertions held.
    Passed,
    /// At least one assertion failed.
    Failed,
    /// The certificate could not be obtained.
    Errored,
}

impl CheckStatus {
    /// Returns a short report label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Hard failures that stop a single check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Certificate ARN output could not be read.
    #[error("failed to read certificate arn: {0}")]
    Output(#[from] OutputError),
    /// Describe call failed.
    #[error("Failure during DescribeCertificate: {0}")]
    Describe(#[from] DescribeError),
    /// Describe call succeeded without a certificate.
    #[error("Expected certificate does not exist! ({arn})")]
    MissingCertificate {
        /// Requested ARN.
        arn: String,
    },
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Check name.
    pub check: CheckName,
    /// Final status.
    pub status: CheckStatus,
    /// Assertion or error messages, empty when passed.
    pub failures: Vec<String>,
}

/// Aggregated suite result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Region the checks ran against.
    pub region: String,
    /// Source of the region.
    pub region_source: RegionSource,
    /// Certificate ARN, when the output lookup succeeded.
    pub certificate_arn: Option<String>,
    /// Fetch mode used.
    pub fetch_mode: FetchMode,
    /// Per-check outcomes in execution order.
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    /// True when every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.status == CheckStatus::Passed)
    }

    /// Number of checks with `status`.
    #[must_use]
    pub fn count(&self, status: CheckStatus) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.status == status).count()
    }

    /// Returns the outcome for `check`.
    #[must_use]
    pub fn outcome(&self, check: CheckName) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.check == check)
    }

    /// Renders a plain-text summary.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "region: {} ({})", self.region, self.region_source.describe());
        let _ = writeln!(
            out,
            "certificate: {}",
            self.certificate_arn.as_deref().unwrap_or("<unresolved>")
        );
        for outcome in &self.outcomes {
            if outcome.failures.is_empty() {
                let _ = writeln!(out, "{} {}", outcome.status.label(), outcome.check.as_str());
            } else {
                let _ = writeln!(
                    out,
                    "{} {}: {}",
                    outcome.status.label(),
                    outcome.check.as_str(),
                    outcome.failures.join("; ")
                );
            }
        }
        let _ = write!(
            out,
            "{} checks: {} passed, {} failed, {} errored",
            self.outcomes.len(),
            self.count(CheckStatus::Passed),
            self.count(CheckStatus::Failed),
            self.count(CheckStatus::Errored)
        );
        out
    }
}

// ============================================================================
// SECTION: Checker
// ============================================================================

/// Fetches certificates through a describer with a missing-result guard.
pub struct CertificateChecker {
    /// Describe-certificate client.
    describer: Arc<dyn CertificateDescriber>,
    /// Sink for fetch and check events.
    events: Arc<dyn ValidationEventSink>,
}

impl CertificateChecker {
    /// Creates a checker with no event sink.
    #[must_use]
    pub fn new(describer: Arc<dyn CertificateDescriber>) -> Self {
        Self {
            describer,
            events: Arc::new(NoopEventSink),
        }
    }

    /// Routes fetch and check events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn ValidationEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Fetches the certificate identified by `arn`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Describe`] when the call fails and
    /// [`CheckError::MissingCertificate`] when no certificate is returned.
    pub fn fetch_certificate(&self, arn: &str) -> Result<Certificate, CheckError> {
        self.fetch_for(None, arn)
    }

    /// Fetches on behalf of `check`, logging the outcome.
    fn fetch_for(&self, check: Option<CheckName>, arn: &str) -> Result<Certificate, CheckError> {
        let result = self.describer.describe_certificate(arn);
        let outcome = match &result {
            Ok(Some(_)) => FetchOutcome::Ok,
            Ok(None) => FetchOutcome::Missing,
            Err(_) => FetchOutcome::Error,
        };
        self.events.emit(ValidationEvent::CertificateFetch {
            check,
            arn: arn.to_string(),
            region: self.describer.region(),
            outcome,
        });
        result?.ok_or_else(|| CheckError::MissingCertificate {
            arn: arn.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Runs the named checks against one certificate.
pub struct CheckSuite {
    /// Certificate fetcher.
    checker: CertificateChecker,
    /// Output lookup for the certificate ARN.
    outputs: Arc<dyn OutputSource>,
    /// Output name holding the ARN.
    output_key: String,
    /// Expected attributes.
    expectations: Expectations,
    /// Fetch strategy.
    fetch_mode: FetchMode,
    /// Region the describer is bound to.
    region: ResolvedRegion,
}

impl CheckSuite {
    /// Creates a suite with default expectations and per-check fetching.
    #[must_use]
    pub fn new(
        checker: CertificateChecker,
        outputs: Arc<dyn OutputSource>,
        region: ResolvedRegion,
    ) -> Self {
        Self {
            checker,
            outputs,
            output_key: CERTIFICATE_ARN_OUTPUT.to_string(),
            expectations: Expectations::default(),
            fetch_mode: FetchMode::default(),
            region,
        }
    }

    /// Overrides the expected attributes.
    #[must_use]
    pub fn with_expectations(mut self, expectations: Expectations) -> Self {
        self.expectations = expectations;
        self
    }

    /// Overrides the fetch strategy.
    #[must_use]
    pub const fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    /// Overrides the output name holding the ARN.
    #[must_use]
    pub fn with_output_key(mut self, output_key: &str) -> Self {
        self.output_key = output_key.to_string();
        self
    }

    /// Runs every check and returns the report.
    #[must_use]
    pub fn run(&self) -> SuiteReport {
        let (certificate_arn, outcomes) = match self.fetch_mode {
            FetchMode::PerCheck => self.run_per_check(),
            FetchMode::Shared => self.run_shared(),
        };
        SuiteReport {
            region: self.region.region.to_string(),
            region_source: self.region.source,
            certificate_arn,
            fetch_mode: self.fetch_mode,
            outcomes,
        }
    }

    /// Looks up the ARN and fetches the certificate for every check.
    fn run_per_check(&self) -> (Option<String>, Vec<CheckOutcome>) {
        let mut certificate_arn = None;
        let mut outcomes = Vec::with_capacity(CheckName::ALL.len());
        for check in CheckName::ALL {
            let fetched = self.lookup_arn().and_then(|arn| {
                if certificate_arn.is_none() {
                    certificate_arn = Some(arn.clone());
                }
                let cert = self.checker.fetch_for(Some(check), &arn)?;
                Ok((arn, cert))
            });
            outcomes.push(self.finish(check, &fetched));
        }
        (certificate_arn, outcomes)
    }

    /// Looks up the ARN and fetches the certificate once.
    fn run_shared(&self) -> (Option<String>, Vec<CheckOutcome>) {
        let arn = self.lookup_arn();
        let certificate_arn = arn.as_ref().ok().cloned();
        let fetched = arn.and_then(|arn| {
            let cert = self.checker.fetch_for(None, &arn)?;
            Ok((arn, cert))
        });
        let outcomes = CheckName::ALL.into_iter().map(|check| self.finish(check, &fetched)).collect();
        (certificate_arn, outcomes)
    }

    /// Reads the certificate ARN output.
    fn lookup_arn(&self) -> Result<String, CheckError> {
        Ok(self.outputs.output(&self.output_key)?)
    }

    /// Evaluates `check` against a fetch result and logs the outcome.
    fn finish(
        &self,
        check: CheckName,
        fetched: &Result<(String, Certificate), CheckError>,
    ) -> CheckOutcome {
        let outcome = match fetched {
            Ok((arn, cert)) => {
                let failures = self.evaluate(check, arn, cert);
                let status =
                    if failures.is_empty() { CheckStatus::Passed } else { CheckStatus::Failed };
                CheckOutcome {
                    check,
                    status,
                    failures,
                }
            }
            Err(err) => CheckOutcome {
                check,
                status: CheckStatus::Errored,
                failures: vec![err.to_string()],
            },
        };
        self.checker.events.emit(ValidationEvent::CheckFinished {
            check,
            status: outcome.status,
            failures: outcome.failures.clone(),
        });
        outcome
    }

    /// Runs the assertions belonging to `check`, collecting failures.
    fn evaluate(&self, check: CheckName, arn: &str, cert: &Certificate) -> Vec<String> {
        let result = match check {
            CheckName::IsDeployed => assert_deployed(cert, arn),
            CheckName::CommonNameIsCorrect => {
                assert_common_name(cert, &self.expectations.domain_name)
            }
            CheckName::SansAreCorrect => {
                assert_sans(cert, &self.expectations.subject_alternative_names)
            }
        };
        result.err().map(|failure| failure.message).into_iter().collect()
    }
}
