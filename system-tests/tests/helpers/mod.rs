// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for ACM Check system-tests.
// Purpose: Provide run artifacts and live AWS wiring.
// Dependencies: system-tests, acm-check-core, acm-check-aws
// ============================================================================

//! ## Overview
//! Shared helpers for ACM Check system-tests.
//! Invariants:
//! - Suites run against already-applied Terraform state.
//! - Every run leaves a `summary.json` under the run root.

pub mod artifacts;
pub mod live;
