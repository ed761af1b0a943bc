// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std, acm-check-config
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

pub use acm_check_config::DEFAULT_TERRAFORM_DIR;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional run root override.
    RunRoot,
    /// Optional Terraform module directory override.
    TerraformDir,
    /// Optional certificate ARN, bypassing Terraform outputs.
    CertificateArn,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "ACM_CHECK_SYSTEM_TEST_RUN_ROOT",
            Self::TerraformDir => "ACM_CHECK_SYSTEM_TEST_TERRAFORM_DIR",
            Self::CertificateArn => "ACM_CHECK_SYSTEM_TEST_CERTIFICATE_ARN",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Terraform module directory holding the applied state.
    pub terraform_dir: PathBuf,
    /// Certificate ARN override.
    pub certificate_arn: Option<String>,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            run_root: None,
            terraform_dir: PathBuf::from(DEFAULT_TERRAFORM_DIR),
            certificate_arn: None,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, a certificate ARN without the `arn:`
    /// prefix).
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let terraform_dir = read_env_nonempty(SystemTestEnv::TerraformDir.as_str())?
            .map_or_else(|| PathBuf::from(DEFAULT_TERRAFORM_DIR), PathBuf::from);
        let certificate_arn = read_env_nonempty(SystemTestEnv::CertificateArn.as_str())?
            .map(|value| parse_certificate_arn(SystemTestEnv::CertificateArn.as_str(), &value))
            .transpose()?;
        Ok(Self {
            run_root,
            terraform_dir,
            certificate_arn,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a certificate ARN override.
///
/// # Errors
///
/// Returns an error when the value is not an `arn:` string.
fn parse_certificate_arn(name: &str, raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("arn:") {
        return Err(format!("{name} must be a certificate ARN"));
    }
    Ok(trimmed.to_string())
}
