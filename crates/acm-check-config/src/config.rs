// crates/acm-check-config/src/config.rs
// ============================================================================
// Module: ACM Check Configuration
// Description: Configuration loading and validation for ACM checks.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: acm-check-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and defaults to the sandbox certificate
//! expectations. When no path is given, `ACM_CHECK_CONFIG` is consulted, then
//! `acm-check.toml` in the working directory; a missing default file yields
//! the built-in defaults. Explicit paths must exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use acm_check_core::CERTIFICATE_ARN_OUTPUT;
use acm_check_core::DEFAULT_FALLBACK_REGION;
use acm_check_core::Expectations;
use acm_check_core::FetchMode;
use acm_check_core::Region;
use acm_check_core::certificate::DEFAULT_EXPECTED_DOMAIN;
use acm_check_core::certificate::DEFAULT_EXPECTED_SANS;
use acm_check_core::terraform::DEFAULT_TERRAFORM_BINARY;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "acm-check.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ACM_CHECK_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of expected subject alternative names (ACM hard limit).
pub(crate) const MAX_EXPECTED_SANS: usize = 100;
/// Maximum length of a domain name.
pub(crate) const MAX_DOMAIN_LENGTH: usize = 253;
/// Default Terraform module directory relative to the working directory.
pub const DEFAULT_TERRAFORM_DIR: &str = "examples/complete";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// ACM check configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcmCheckConfig {
    /// Expected certificate attributes.
    #[serde(default)]
    pub certificate: CertificateConfig,
    /// Region resolution settings.
    #[serde(default)]
    pub region: RegionConfig,
    /// Terraform output lookup settings.
    #[serde(default)]
    pub terraform: TerraformConfig,
    /// Suite execution settings.
    #[serde(default)]
    pub run: RunConfig,
    /// Event log routing.
    #[serde(default)]
    pub log: LogConfig,
}

/// Expected certificate attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateConfig {
    /// Output name holding the certificate ARN.
    #[serde(default = "default_output_key")]
    pub output_key: String,
    /// Expected common name.
    #[serde(default = "default_expected_domain")]
    pub expected_domain: String,
    /// Expected subject alternative names (order-insensitive).
    #[serde(default = "default_expected_sans")]
    pub expected_sans: Vec<String>,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            output_key: default_output_key(),
            expected_domain: default_expected_domain(),
            expected_sans: default_expected_sans(),
        }
    }
}

/// Region resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    /// Region used when env and ambient config yield nothing.
    #[serde(default = "default_fallback_region")]
    pub fallback: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback_region(),
        }
    }
}

/// Terraform output lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerraformConfig {
    /// Terraform module working directory.
    #[serde(default = "default_terraform_dir")]
    pub working_dir: PathBuf,
    /// Terraform executable.
    #[serde(default = "default_terraform_binary")]
    pub binary: String,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            working_dir: default_terraform_dir(),
            binary: default_terraform_binary(),
        }
    }
}

/// Suite execution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Fetch strategy.
    #[serde(default)]
    pub fetch: FetchMode,
}

/// Event log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `log.path`.
    File,
    /// Events discarded.
    None,
}

/// Event log routing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Destination kind.
    #[serde(default)]
    pub sink: LogSinkKind,
    /// Log file path (required for `file`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl AcmCheckConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, implicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if implicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.certificate.validate()?;
        self.region.validate()?;
        self.terraform.validate()?;
        self.log.validate()
    }

    /// Returns the expected certificate attributes.
    #[must_use]
    pub fn expectations(&self) -> Expectations {
        Expectations {
            domain_name: self.certificate.expected_domain.trim().to_string(),
            subject_alternative_names: self
                .certificate
                .expected_sans
                .iter()
                .map(|name| name.trim().to_string())
                .collect(),
        }
    }

    /// Returns the fallback region.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the fallback is empty.
    pub fn fallback_region(&self) -> Result<Region, ConfigError> {
        Region::new(self.region.fallback.clone())
            .map_err(|err| ConfigError::Invalid(format!("region.fallback: {err}")))
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl CertificateConfig {
    /// Validates certificate expectations.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.output_key.trim().is_empty() {
            return Err(ConfigError::Invalid("certificate.output_key must be non-empty".to_string()));
        }
        validate_domain("certificate.expected_domain", &self.expected_domain)?;
        if self.expected_sans.len() > MAX_EXPECTED_SANS {
            return Err(ConfigError::Invalid(format!(
                "certificate.expected_sans exceeds {MAX_EXPECTED_SANS} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for name in &self.expected_sans {
            validate_domain("certificate.expected_sans", name)?;
            if !seen.insert(name.trim()) {
                return Err(ConfigError::Invalid(format!(
                    "certificate.expected_sans contains duplicate {}",
                    name.trim()
                )));
            }
        }
        Ok(())
    }
}

impl RegionConfig {
    /// Validates the fallback region.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback.trim().is_empty() {
            return Err(ConfigError::Invalid("region.fallback must be non-empty".to_string()));
        }
        Ok(())
    }
}

impl TerraformConfig {
    /// Validates Terraform lookup settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("terraform.working_dir", &self.working_dir.to_string_lossy())?;
        validate_path_string("terraform.binary", &self.binary)
    }
}

impl LogConfig {
    /// Validates log routing.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("log.path is required when log.sink = \"file\"".to_string()))
            }
            (LogSinkKind::File, Some(path)) => validate_path_string("log.path", &path.to_string_lossy()),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("log.path is only valid when log.sink = \"file\"".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default output key.
fn default_output_key() -> String {
    CERTIFICATE_ARN_OUTPUT.to_string()
}

/// Default expected domain.
fn default_expected_domain() -> String {
    DEFAULT_EXPECTED_DOMAIN.to_string()
}

/// Default expected SANs.
fn default_expected_sans() -> Vec<String> {
    DEFAULT_EXPECTED_SANS.iter().map(|name| (*name).to_string()).collect()
}

/// Default fallback region.
fn default_fallback_region() -> String {
    DEFAULT_FALLBACK_REGION.to_string()
}

/// Default Terraform module directory.
fn default_terraform_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TERRAFORM_DIR)
}

/// Default Terraform binary.
fn default_terraform_binary() -> String {
    DEFAULT_TERRAFORM_BINARY.to_string()
}

/// Resolves the config path; the flag is true for the implicit default.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), false));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        if env_path.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must not be empty")));
        }
        return Ok((PathBuf::from(env_path), false));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), true))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a DNS name (wildcards allowed) for expectations.
fn validate_domain(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not contain empty names")));
    }
    if trimmed.len() > MAX_DOMAIN_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} name exceeds {MAX_DOMAIN_LENGTH} bytes")));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} name {trimmed} contains whitespace")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
