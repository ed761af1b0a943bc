// crates/acm-check-aws/src/acm.rs
// ============================================================================
// Module: ACM Certificate Client
// Description: aws-sdk-acm implementation of the certificate describer.
// Purpose: Describe certificates and map SDK results into core types.
// Dependencies: aws-sdk-acm, acm-check-core
// ============================================================================

//! ## Overview
//! [`AcmCertificateClient`] issues `DescribeCertificate` and converts the
//! response into an `acm_check_core::Certificate`. Not-found and invalid-ARN
//! service errors are classified; everything else is a backend error carrying
//! the full SDK error context.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Debug;

use acm_check_core::Certificate;
use acm_check_core::CertificateDescriber;
use acm_check_core::DescribeError;
use aws_config::SdkConfig;
use aws_sdk_acm::Client;
use aws_sdk_acm::error::DisplayErrorContext;
use aws_sdk_acm::error::SdkError;
use aws_sdk_acm::operation::describe_certificate::DescribeCertificateError;
use aws_sdk_acm::types::CertificateDetail;

use crate::runtime::AwsRuntime;

// ============================================================================
// SECTION: Client
// ============================================================================

/// ACM-backed certificate describer.
#[derive(Clone)]
pub struct AcmCertificateClient {
    /// Underlying ACM client.
    client: Client,
    /// Runtime for blocking SDK calls.
    runtime: AwsRuntime,
    /// Region the client is bound to.
    region: Option<String>,
}

impl AcmCertificateClient {
    /// Builds a client from shared SDK configuration.
    #[must_use]
    pub fn new(config: &SdkConfig, runtime: AwsRuntime) -> Self {
        Self {
            client: Client::new(config),
            runtime,
            region: config.region().map(ToString::to_string),
        }
    }
}

impl CertificateDescriber for AcmCertificateClient {
    fn describe_certificate(&self, arn: &str) -> Result<Option<Certificate>, DescribeError> {
        let client = self.client.clone();
        let request_arn = arn.to_string();
        let response = self
            .runtime
            .block_on(async move {
                client.describe_certificate().certificate_arn(request_arn).send().await
            })
            .map_err(|err| DescribeError::Backend(err.to_string()))?;
        let output = response.map_err(|err| map_describe_error(arn, err))?;
        Ok(output.certificate().map(certificate_from_detail))
    }

    fn region(&self) -> Option<String> {
        self.region.clone()
    }
}

// ============================================================================
// SECTION: Mapping
// ============================================================================

/// Converts an ACM certificate detail into the core model.
pub(crate) fn certificate_from_detail(detail: &CertificateDetail) -> Certificate {
    Certificate {
        arn: detail.certificate_arn().unwrap_or_default().to_string(),
        domain_name: detail.domain_name().unwrap_or_default().to_string(),
        subject_alternative_names: detail.subject_alternative_names().iter().cloned().collect(),
        status: detail.status().map(|status| status.as_str().to_string()),
        certificate_type: detail.r#type().map(|kind| kind.as_str().to_string()),
    }
}

/// Maps an SDK error to a describe error.
fn map_describe_error<R>(arn: &str, err: SdkError<DescribeCertificateError, R>) -> DescribeError
where
    R: Debug + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    classify_service_error(arn, &err.into_service_error(), message)
}

/// Classifies a modeled service error.
fn classify_service_error(
    arn: &str,
    err: &DescribeCertificateError,
    message: String,
) -> DescribeError {
    if err.is_resource_not_found_exception() {
        return DescribeError::NotFound {
            arn: arn.to_string(),
        };
    }
    if err.is_invalid_arn_exception() {
        return DescribeError::InvalidArn {
            arn: arn.to_string(),
        };
    }
    DescribeError::Backend(message)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
