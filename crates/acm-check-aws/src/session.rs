// crates/acm-check-aws/src/session.rs
// ============================================================================
// Module: AWS Session
// Description: Shared SDK configuration loaded once per run.
// Purpose: Thread one explicit configuration object into every client.
// Dependencies: aws-config, acm-check-core
// ============================================================================

//! ## Overview
//! An [`AwsSession`] loads the shared SDK configuration once, either pinned to
//! a resolved region or from the ambient provider chain alone, and builds
//! clients from it.

use acm_check_core::Region;
use aws_config::BehaviorVersion;
use aws_config::SdkConfig;

use crate::acm::AcmCertificateClient;
use crate::runtime::AwsRuntime;
use crate::runtime::AwsSetupError;

/// Loaded SDK configuration plus the runtime that drives its clients.
pub struct AwsSession {
    /// Runtime used by clients built from this session.
    runtime: AwsRuntime,
    /// Shared SDK configuration.
    config: SdkConfig,
}

impl AwsSession {
    /// Loads configuration pinned to `region`.
    ///
    /// # Errors
    ///
    /// Returns [`AwsSetupError`] when the runtime is unavailable.
    pub fn load_with_region(runtime: &AwsRuntime, region: &Region) -> Result<Self, AwsSetupError> {
        Self::load(runtime, Some(region.to_string()))
    }

    /// Loads configuration from the ambient provider chain only.
    ///
    /// # Errors
    ///
    /// Returns [`AwsSetupError`] when the runtime is unavailable.
    pub fn load_default(runtime: &AwsRuntime) -> Result<Self, AwsSetupError> {
        Self::load(runtime, None)
    }

    /// Loads the shared configuration.
    fn load(runtime: &AwsRuntime, region: Option<String>) -> Result<Self, AwsSetupError> {
        let config = runtime.block_on(async move {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(aws_config::Region::new(region));
            }
            loader.load().await
        })?;
        Ok(Self {
            runtime: runtime.clone(),
            config,
        })
    }

    /// Region the configuration is bound to, if any.
    #[must_use]
    pub fn region(&self) -> Option<String> {
        self.config.region().map(ToString::to_string)
    }

    /// Returns the shared SDK configuration.
    #[must_use]
    pub const fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Builds an ACM client from this session.
    #[must_use]
    pub fn acm_client(&self) -> AcmCertificateClient {
        AcmCertificateClient::new(&self.config, self.runtime.clone())
    }
}
