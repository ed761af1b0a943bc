// crates/acm-check-core/src/certificate.rs
// ============================================================================
// Module: Certificate Model
// Description: Certificate attributes and the assertions run against them.
// Purpose: Compare a described certificate to expected literals.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Certificate`] is the read-only subset of ACM certificate metadata the
//! checks need. Assertions return [`AssertionFailure`] with a human-readable
//! message; callers decide whether a failure is fatal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Expected common name for the sandbox certificate.
pub const DEFAULT_EXPECTED_DOMAIN: &str = "terratest.sandbox.launch.nttdata.com";
/// Expected subject alternative names for the sandbox certificate.
pub const DEFAULT_EXPECTED_SANS: [&str; 2] =
    ["www.terratest.sandbox.launch.nttdata.com", "terratest.sandbox.launch.nttdata.com"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Certificate metadata returned by the describe API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate ARN.
    pub arn: String,
    /// Primary domain (common name).
    pub domain_name: String,
    /// Subject alternative names.
    pub subject_alternative_names: BTreeSet<String>,
    /// Status label (for example `ISSUED`).
    #[serde(default)]
    pub status: Option<String>,
    /// Certificate type label (for example `AMAZON_ISSUED`).
    #[serde(default)]
    pub certificate_type: Option<String>,
}

/// Expected certificate attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectations {
    /// Expected common name.
    pub domain_name: String,
    /// Expected subject alternative names.
    pub subject_alternative_names: BTreeSet<String>,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            domain_name: DEFAULT_EXPECTED_DOMAIN.to_string(),
            subject_alternative_names: DEFAULT_EXPECTED_SANS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

/// A failed assertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    /// Human-readable mismatch description.
    pub message: String,
}

impl AssertionFailure {
    /// Creates a failure from a message.
    fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Passes iff the certificate ARN equals `expected_arn`.
///
/// # Errors
///
/// Returns [`AssertionFailure`] on mismatch.
pub fn assert_deployed(cert: &Certificate, expected_arn: &str) -> Result<(), AssertionFailure> {
    if cert.arn == expected_arn {
        return Ok(());
    }
    Err(AssertionFailure::new(format!(
        "Certificate ARN does not match! expected {expected_arn}, got {}",
        cert.arn
    )))
}

/// Passes iff the certificate domain equals `expected_domain`.
///
/// # Errors
///
/// Returns [`AssertionFailure`] on mismatch.
pub fn assert_common_name(
    cert: &Certificate,
    expected_domain: &str,
) -> Result<(), AssertionFailure> {
    if cert.domain_name == expected_domain {
        return Ok(());
    }
    Err(AssertionFailure::new(format!(
        "Common Name does not match! expected {expected_domain}, got {}",
        cert.domain_name
    )))
}

/// Passes iff the certificate SANs equal `expected` as sets.
///
/// # Errors
///
/// Returns [`AssertionFailure`] listing missing and unexpected names.
pub fn assert_sans(cert: &Certificate, expected: &BTreeSet<String>) -> Result<(), AssertionFailure> {
    let actual = &cert.subject_alternative_names;
    if actual == expected {
        return Ok(());
    }
    let missing: Vec<&str> = expected.difference(actual).map(String::as_str).collect();
    let unexpected: Vec<&str> = actual.difference(expected).map(String::as_str).collect();
    Err(AssertionFailure::new(format!(
        "SANs do not match! missing [{}], unexpected [{}]",
        missing.join(", "),
        unexpected.join(", ")
    )))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
