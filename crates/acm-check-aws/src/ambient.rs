// crates/acm-check-aws/src/ambient.rs
// ============================================================================
// Module: Ambient AWS Region
// Description: Region lookup through shared config files and instance metadata.
// Purpose: Supply the third step of region resolution.
// Dependencies: aws-config, acm-check-core
// ============================================================================

//! ## Overview
//! [`AwsAmbientRegion`] asks the profile files (`AWS_CONFIG_FILE`,
//! `AWS_PROFILE`) and then IMDS for a region. The environment variables are
//! left out of this chain because the resolver already checked them, and the
//! SDK's env provider would hand back a set-but-empty `AWS_REGION` verbatim.
//! Blank answers count as no region.

// ============================================================================
// SECTION: Imports
// ============================================================================

use acm_check_core::AmbientRegionProvider;
use acm_check_core::RegionError;
use aws_config::imds::region::ImdsRegionProvider;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileRegionProvider;

use crate::runtime::AwsRuntime;

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Reads the region from profile files or instance metadata.
pub struct AwsAmbientRegion {
    /// Runtime used to drive the provider chain.
    runtime: AwsRuntime,
}

impl AwsAmbientRegion {
    /// Creates a provider driven by `runtime`.
    #[must_use]
    pub fn new(runtime: &AwsRuntime) -> Self {
        Self {
            runtime: runtime.clone(),
        }
    }
}

impl AmbientRegionProvider for AwsAmbientRegion {
    fn region(&self) -> Result<Option<String>, RegionError> {
        let region = self
            .runtime
            .block_on(async {
                RegionProviderChain::first_try(ProfileFileRegionProvider::new())
                    .or_else(ImdsRegionProvider::builder().build())
                    .region()
                    .await
            })
            .map_err(|err| RegionError::Ambient(err.to_string()))?;
        Ok(region.map(|region| region.as_ref().trim().to_string()).filter(|code| !code.is_empty()))
    }
}
