// crates/acm-check-aws/src/lib.rs
// ============================================================================
// Module: ACM Check AWS Library
// Description: AWS SDK implementations of the acm-check-core seams.
// Purpose: Describe ACM certificates and read ambient AWS region config.
// Dependencies: acm-check-core, aws-config, aws-sdk-acm, tokio
// ============================================================================

//! ## Overview
//! This crate binds the synchronous `acm-check-core` traits to the async AWS
//! SDK. A single [`AwsRuntime`] drives SDK futures; an [`AwsSession`] holds the
//! shared SDK configuration loaded once per run and hands out
//! [`AcmCertificateClient`]s built from it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod acm;
pub mod ambient;
pub mod runtime;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use acm::AcmCertificateClient;
pub use ambient::AwsAmbientRegion;
pub use runtime::AwsRuntime;
pub use runtime::AwsSetupError;
pub use session::AwsSession;
