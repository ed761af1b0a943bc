// system-tests/src/lib.rs
// ============================================================================
// Module: ACM Check System Tests Library
// Description: Shared configuration for live-infrastructure system tests.
// Purpose: Provide env-driven settings for the ACM system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the ACM Check system-test
//! binaries in `system-tests/tests`. The suites talk to real AWS accounts and
//! only build with the `system-tests` feature.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
