// crates/acm-check-core/src/lib.rs
// ============================================================================
// Module: ACM Check Core Library
// Description: Region resolution and certificate validation for ACM checks.
// Purpose: Validate a deployed ACM certificate against expected attributes.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `acm-check-core` holds the backend-agnostic half of ACM certificate
//! validation: deterministic region resolution, the certificate model, the
//! narrow [`CertificateDescriber`] seam, infrastructure output lookup, and the
//! check suite that turns fetched certificates into a [`SuiteReport`].
//!
//! Nothing in this crate talks to the network. AWS-backed implementations of
//! the seams live in `acm-check-aws`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod certificate;
pub mod checker;
pub mod describer;
pub mod events;
pub mod outputs;
pub mod region;
pub mod terraform;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use certificate::AssertionFailure;
pub use certificate::Certificate;
pub use certificate::Expectations;
pub use certificate::assert_common_name;
pub use certificate::assert_deployed;
pub use certificate::assert_sans;
pub use checker::CertificateChecker;
pub use checker::CheckError;
pub use checker::CheckName;
pub use checker::CheckOutcome;
pub use checker::CheckStatus;
pub use checker::CheckSuite;
pub use checker::FetchMode;
pub use checker::SuiteReport;
pub use describer::CertificateDescriber;
pub use describer::DescribeError;
pub use events::EventRecord;
pub use events::FileEventSink;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use events::ValidationEvent;
pub use events::ValidationEventSink;
pub use outputs::CERTIFICATE_ARN_OUTPUT;
pub use outputs::OutputError;
pub use outputs::OutputSource;
pub use outputs::StaticOutputs;
pub use region::AWS_DEFAULT_REGION_ENV;
pub use region::AWS_REGION_ENV;
pub use region::AmbientRegionProvider;
pub use region::DEFAULT_FALLBACK_REGION;
pub use region::EnvSource;
pub use region::MapEnv;
pub use region::NoAmbientRegion;
pub use region::ProcessEnv;
pub use region::Region;
pub use region::RegionError;
pub use region::RegionResolver;
pub use region::RegionSource;
pub use region::ResolvedRegion;
pub use terraform::TerraformOutputs;
