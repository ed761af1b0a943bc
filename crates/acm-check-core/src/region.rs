// crates/acm-check-core/src/region.rs
// ============================================================================
// Module: Region Resolution
// Description: Deterministic AWS region resolution with explicit precedence.
// Purpose: Pick the region for ACM calls once per run and report its source.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The region is resolved from, in order: `AWS_REGION`, `AWS_DEFAULT_REGION`,
//! ambient provider configuration, and finally a fallback literal. Resolution
//! never fails; an ambient lookup error is logged and treated as "no region".
//!
//! Environment and ambient configuration are reached through the
//! [`EnvSource`] and [`AmbientRegionProvider`] traits so tests can substitute
//! deterministic inputs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::events::NoopEventSink;
use crate::events::ValidationEvent;
use crate::events::ValidationEventSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Primary region environment variable.
pub const AWS_REGION_ENV: &str = "AWS_REGION";
/// Secondary region environment variable.
pub const AWS_DEFAULT_REGION_ENV: &str = "AWS_DEFAULT_REGION";
/// Region used when no other source yields a value.
pub const DEFAULT_FALLBACK_REGION: &str = "us-west-2";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Region resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// Region code was empty or whitespace.
    #[error("region must not be empty")]
    Empty,
    /// Ambient configuration could not be loaded.
    #[error("ambient region lookup failed: {0}")]
    Ambient(String),
}

/// Non-empty AWS region code (for example `us-west-2`).
///
/// # Invariants
/// - The inner value is non-empty and carries no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Creates a region from a code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Empty`] when the code is empty or whitespace.
    pub fn new(code: impl Into<String>) -> Result<Self, RegionError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(RegionError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the region code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Region {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.0
    }
}

/// Where a resolved region came from.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSource {
    /// `AWS_REGION` environment variable.
    AwsRegionEnv,
    /// `AWS_DEFAULT_REGION` environment variable.
    AwsDefaultRegionEnv,
    /// Ambient provider configuration (profile files, instance metadata).
    AmbientConfig,
    /// Fallback literal.
    Fallback,
}

impl RegionSource {
    /// Returns a stable label for the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwsRegionEnv => "aws_region_env",
            Self::AwsDefaultRegionEnv => "aws_default_region_env",
            Self::AmbientConfig => "ambient_config",
            Self::Fallback => "fallback",
        }
    }

    /// Returns a human-readable description of the source.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::AwsRegionEnv => "AWS_REGION environment variable",
            Self::AwsDefaultRegionEnv => "AWS_DEFAULT_REGION environment variable",
            Self::AmbientConfig => "AWS config",
            Self::Fallback => "fallback",
        }
    }
}

/// Region together with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRegion {
    /// Resolved region.
    pub region: Region,
    /// Resolution source.
    pub source: RegionSource,
}

// ============================================================================
// SECTION: Environment Sources
// ============================================================================

/// Read-only view of environment variables.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `name` when set and valid UTF-8.
    fn var(&self, name: &str) -> Option<String>;
}

/// Process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Map-backed environment for tests and explicit overrides.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    /// Variable values keyed by name.
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the environment with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

// ============================================================================
// SECTION: Ambient Configuration
// ============================================================================

/// Region lookup against ambient provider configuration.
pub trait AmbientRegionProvider: Send + Sync {
    /// Returns the configured region, `None` when none is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Ambient`] when configuration cannot be loaded.
    fn region(&self) -> Result<Option<String>, RegionError>;
}

/// Ambient provider that never yields a region.
pub struct NoAmbientRegion;

impl AmbientRegionProvider for NoAmbientRegion {
    fn region(&self) -> Result<Option<String>, RegionError> {
        Ok(None)
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves the AWS region using a fixed precedence chain.
pub struct RegionResolver {
    /// Environment variable source.
    env: Arc<dyn EnvSource>,
    /// Ambient configuration source.
    ambient: Arc<dyn AmbientRegionProvider>,
    /// Region used when every other source is empty.
    fallback: Region,
    /// Sink for resolution events.
    events: Arc<dyn ValidationEventSink>,
}

impl RegionResolver {
    /// Creates a resolver with the default fallback and no event sink.
    #[must_use]
    pub fn new(env: Arc<dyn EnvSource>, ambient: Arc<dyn AmbientRegionProvider>) -> Self {
        Self {
            env,
            ambient,
            fallback: Region(DEFAULT_FALLBACK_REGION.to_string()),
            events: Arc::new(NoopEventSink),
        }
    }

    /// Overrides the fallback region.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Region) -> Self {
        self.fallback = fallback;
        self
    }

    /// Routes resolution events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn ValidationEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Resolves the region. Never fails.
    #[must_use]
    pub fn resolve(&self) -> ResolvedRegion {
        let resolved = self.resolve_quiet();
        self.events.emit(ValidationEvent::RegionResolved {
            region: resolved.region.to_string(),
            source: resolved.source,
        });
        resolved
    }

    /// Walks the precedence chain without emitting the final event.
    fn resolve_quiet(&self) -> ResolvedRegion {
        if let Some(region) = self.env_region(AWS_REGION_ENV) {
            return ResolvedRegion {
                region,
                source: RegionSource::AwsRegionEnv,
            };
        }
        if let Some(region) = self.env_region(AWS_DEFAULT_REGION_ENV) {
            return ResolvedRegion {
                region,
                source: RegionSource::AwsDefaultRegionEnv,
            };
        }
        match self.ambient.region() {
            Ok(Some(code)) => {
                if let Ok(region) = Region::new(code) {
                    return ResolvedRegion {
                        region,
                        source: RegionSource::AmbientConfig,
                    };
                }
            }
            Ok(None) => {}
            Err(err) => {
                self.events.emit(ValidationEvent::RegionAmbientError {
                    message: err.to_string(),
                });
            }
        }
        ResolvedRegion {
            region: self.fallback.clone(),
            source: RegionSource::Fallback,
        }
    }

    /// Reads a non-empty region from an environment variable.
    fn env_region(&self, name: &str) -> Option<Region> {
        self.env.var(name).and_then(|value| Region::new(value).ok())
    }
}
