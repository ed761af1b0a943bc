// crates/acm-check-config/src/lib.rs
// ============================================================================
// Module: ACM Check Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for acm-check.toml semantics.
// Dependencies: acm-check-core, serde, toml
// ============================================================================

//! ## Overview
//! `acm-check-config` defines the configuration model for ACM certificate
//! checks: expected certificate attributes, the region fallback, Terraform
//! output lookup, fetch strategy and log routing. Validation is strict and
//! fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
