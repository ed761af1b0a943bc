// system-tests/tests/suites/complete.rs
// =============================================================================
// Module: Complete Example Tests
// Description: Live ACM checks against the certificate from `examples/complete`.
// Purpose: Confirm deployment, common name and SANs, and fail-closed lookups.
// Dependencies: system-tests helpers
// =============================================================================

use acm_check_core::CheckError;
use acm_check_core::CheckName;
use acm_check_core::CheckStatus;
use acm_check_core::CheckSuite;
use acm_check_core::DEFAULT_FALLBACK_REGION;
use acm_check_core::FetchMode;
use acm_check_core::RegionSource;
use acm_check_core::ValidationEvent;
use helpers::artifacts::SuiteRun;
use helpers::live::LiveHarness;

use crate::helpers;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Well-formed ARN that no account owns.
const MISSING_CERTIFICATE_ARN: &str =
    "arn:aws:acm:us-west-2:000000000000:certificate/00000000-0000-0000-0000-000000000000";

#[test]
fn complete_certificate_passes_all_checks() -> TestResult {
    let mut run = SuiteRun::start("complete_certificate_passes_all_checks")?;
    let harness = LiveHarness::connect()?;
    let region = harness.resolved.clone();
    run.record_region(&region);

    let report = CheckSuite::new(harness.checker, harness.outputs, harness.resolved)
        .with_fetch_mode(FetchMode::PerCheck)
        .run();
    run.record_report(&report)?;
    run.record_events(&harness.events.events())?;

    for check in CheckName::ALL {
        let outcome = report.outcome(check).ok_or_else(|| format!("{} missing", check.as_str()))?;
        if outcome.status != CheckStatus::Passed {
            let failures = outcome.failures.join("; ");
            return Err(
                format!("{} {}: {failures}", check.as_str(), outcome.status.label()).into()
            );
        }
    }
    if report.region != region.region.as_str() {
        return Err("report region differs from resolved region".into());
    }

    run.pass(&format!("certificate validated in region {}", region.region))?;
    Ok(())
}

#[test]
fn shared_fetch_issues_single_describe() -> TestResult {
    let mut run = SuiteRun::start("shared_fetch_issues_single_describe")?;
    let harness = LiveHarness::connect()?;
    run.record_region(&harness.resolved);

    let report = CheckSuite::new(harness.checker, harness.outputs, harness.resolved)
        .with_fetch_mode(FetchMode::Shared)
        .run();
    let events = harness.events.events();
    run.record_report(&report)?;
    run.record_events(&events)?;

    if !report.all_passed() {
        return Err(report.render_text().into());
    }
    let fetches = events
        .iter()
        .filter(|event| matches!(event, ValidationEvent::CertificateFetch { .. }))
        .count();
    if fetches != 1 {
        return Err(format!("expected one describe call, saw {fetches}").into());
    }

    run.pass("shared fetch mode described the certificate once")?;
    Ok(())
}

#[test]
fn missing_certificate_fails_closed() -> TestResult {
    let mut run = SuiteRun::start("missing_certificate_fails_closed")?;
    let harness = LiveHarness::connect()?;
    run.record_region(&harness.resolved);

    let err = match harness.checker.fetch_certificate(MISSING_CERTIFICATE_ARN) {
        Ok(cert) => return Err(format!("unexpected certificate {}", cert.arn).into()),
        Err(err) => err,
    };
    if !matches!(err, CheckError::Describe(_) | CheckError::MissingCertificate { .. }) {
        return Err(format!("unexpected error kind: {err}").into());
    }
    run.record_events(&harness.events.events())?;

    run.pass(&format!("describe on unknown arn failed: {err}"))?;
    Ok(())
}

#[test]
fn region_is_resolved_and_logged() -> TestResult {
    let mut run = SuiteRun::start("region_is_resolved_and_logged")?;
    let harness = LiveHarness::connect()?;
    run.record_region(&harness.resolved);
    let events = harness.events.events();
    run.record_events(&events)?;

    let logged = events.iter().any(|event| {
        matches!(
            event,
            ValidationEvent::RegionResolved { region, source }
                if region == harness.resolved.region.as_str() && *source == harness.resolved.source
        )
    });
    if !logged {
        return Err("region resolution was not logged".into());
    }
    if harness.resolved.source == RegionSource::Fallback
        && harness.resolved.region.as_str() != DEFAULT_FALLBACK_REGION
    {
        return Err("fallback source reported a non-fallback region".into());
    }

    run.pass(&format!("resolved from {}", harness.resolved.source.describe()))?;
    Ok(())
}
