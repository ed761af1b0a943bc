// crates/acm-check-core/src/outputs.rs
// ============================================================================
// Module: Infrastructure Outputs
// Description: Lookup of named values exported by a provisioning run.
// Purpose: Resolve the certificate ARN without coupling checks to Terraform.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! An [`OutputSource`] maps an output name to its string value. The
//! Terraform-backed source lives in [`crate::terraform`]; [`StaticOutputs`]
//! serves explicit overrides and tests.

use std::collections::BTreeMap;

use thiserror::Error;

/// Output name holding the certificate ARN.
pub const CERTIFICATE_ARN_OUTPUT: &str = "certificate_arn";

/// Output lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// Output is not defined.
    #[error("output {key} is not defined")]
    Missing {
        /// Output name.
        key: String,
    },
    /// Output exists but is not a string.
    #[error("output {key} is not a string")]
    NotString {
        /// Output name.
        key: String,
    },
    /// Output command could not run or exited unsuccessfully.
    #[error("output command failed: {0}")]
    Command(String),
    /// Output payload could not be parsed.
    #[error("output payload invalid: {0}")]
    Parse(String),
}

/// Named output lookup.
pub trait OutputSource: Send + Sync {
    /// Returns the string value of output `key`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output is missing or unreadable.
    fn output(&self, key: &str) -> Result<String, OutputError>;
}

/// Fixed output values.
#[derive(Debug, Clone, Default)]
pub struct StaticOutputs {
    /// Output values keyed by name.
    values: BTreeMap<String, String>,
}

impl StaticOutputs {
    /// Creates an empty output set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with `key` bound to `value`.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl OutputSource for StaticOutputs {
    fn output(&self, key: &str) -> Result<String, OutputError> {
        self.values.get(key).cloned().ok_or_else(|| OutputError::Missing {
            key: key.to_string(),
        })
    }
}
