// system-tests/tests/helpers/live.rs
// ============================================================================
// Module: Live AWS Wiring
// Description: Builds the real region resolver, ACM client and output source.
// Purpose: Give suites the same wiring the `acm-check run` command uses.
// Dependencies: acm-check-core, acm-check-aws, system-tests
// ============================================================================

use std::sync::Arc;

use acm_check_aws::AwsAmbientRegion;
use acm_check_aws::AwsRuntime;
use acm_check_aws::AwsSession;
use acm_check_core::CERTIFICATE_ARN_OUTPUT;
use acm_check_core::CertificateChecker;
use acm_check_core::MemoryEventSink;
use acm_check_core::OutputSource;
use acm_check_core::ProcessEnv;
use acm_check_core::RegionResolver;
use acm_check_core::ResolvedRegion;
use acm_check_core::StaticOutputs;
use acm_check_core::TerraformOutputs;
use acm_check_core::terraform::DEFAULT_TERRAFORM_BINARY;
use system_tests::config::SystemTestConfig;

/// Live AWS handles for one test.
pub struct LiveHarness {
    /// Region resolved from the process environment.
    pub resolved: ResolvedRegion,
    /// Checker bound to the resolved region.
    pub checker: CertificateChecker,
    /// Events recorded by the resolver and checker.
    pub events: Arc<MemoryEventSink>,
    /// ARN source for the suite.
    pub outputs: Arc<dyn OutputSource>,
}

impl LiveHarness {
    /// Resolves the region and builds an ACM-backed checker.
    pub fn connect() -> Result<Self, String> {
        let config = SystemTestConfig::load()?;
        let runtime = AwsRuntime::new().map_err(|err| err.to_string())?;
        let events = Arc::new(MemoryEventSink::new());
        let resolved =
            RegionResolver::new(Arc::new(ProcessEnv), Arc::new(AwsAmbientRegion::new(&runtime)))
                .with_events(Arc::clone(&events))
                .resolve();
        let session = AwsSession::load_with_region(&runtime, &resolved.region)
            .map_err(|err| err.to_string())?;
        let checker =
            CertificateChecker::new(Arc::new(session.acm_client())).with_events(Arc::clone(&events));
        Ok(Self {
            resolved,
            checker,
            events,
            outputs: outputs_for(&config),
        })
    }
}

/// Uses the ARN override when present, else `terraform output`.
fn outputs_for(config: &SystemTestConfig) -> Arc<dyn OutputSource> {
    match &config.certificate_arn {
        Some(arn) => Arc::new(StaticOutputs::new().with(CERTIFICATE_ARN_OUTPUT, arn)),
        None => {
            Arc::new(TerraformOutputs::new(DEFAULT_TERRAFORM_BINARY, config.terraform_dir.clone()))
        }
    }
}
