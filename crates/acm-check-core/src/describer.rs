// crates/acm-check-core/src/describer.rs
// ============================================================================
// Module: Certificate Describer
// Description: Narrow client seam for the describe-certificate API.
// Purpose: Let checks run against ACM or an in-memory stub.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`CertificateDescriber`] exposes only the one read call the checks need.
//! `Ok(None)` models a response that carried no certificate object.

use thiserror::Error;

use crate::certificate::Certificate;

/// Describe-certificate failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescribeError {
    /// No certificate exists for the ARN.
    #[error("certificate not found: {arn}")]
    NotFound {
        /// Requested ARN.
        arn: String,
    },
    /// ARN was rejected as malformed.
    #[error("invalid certificate arn: {arn}")]
    InvalidArn {
        /// Requested ARN.
        arn: String,
    },
    /// Transport, permission, or other provider failure.
    #[error("describe certificate failed: {0}")]
    Backend(String),
}

/// Minimal certificate client abstraction.
pub trait CertificateDescriber: Send + Sync {
    /// Describes the certificate identified by `arn`.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError`] when the provider call fails.
    fn describe_certificate(&self, arn: &str) -> Result<Option<Certificate>, DescribeError>;

    /// Region the client is bound to, when known.
    fn region(&self) -> Option<String> {
        None
    }
}
