// crates/acm-check-aws/src/runtime.rs
// ============================================================================
// Module: AWS Runtime
// Description: Tokio runtime used to drive AWS SDK futures from sync code.
// Purpose: Block on SDK calls whether or not a runtime is already running.
// Dependencies: tokio, thiserror
// ============================================================================

//! ## Overview
//! The SDK is async while the check suite is synchronous. [`AwsRuntime`] owns
//! a multi-thread runtime and blocks on SDK futures, reusing the caller's
//! runtime when one is already active.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// AWS setup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AwsSetupError {
    /// Runtime could not be created or was shut down.
    #[error("aws runtime error: {0}")]
    Runtime(String),
}

// ============================================================================
// SECTION: Runtime
// ============================================================================

/// Shared runtime for blocking AWS SDK calls.
#[derive(Clone)]
pub struct AwsRuntime {
    /// Tokio runtime, taken on drop.
    runtime: Option<Arc<Runtime>>,
}

impl AwsRuntime {
    /// Creates a new multi-thread runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AwsSetupError::Runtime`] when the runtime cannot be built.
    pub fn new() -> Result<Self, AwsSetupError> {
        let runtime = Runtime::new().map_err(|err| AwsSetupError::Runtime(err.to_string()))?;
        Ok(Self {
            runtime: Some(Arc::new(runtime)),
        })
    }

    /// Blocks on `future` using a compatible runtime.
    pub(crate) fn block_on<F, T>(&self, future: F) -> Result<T, AwsSetupError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if let Ok(handle) = Handle::try_current() {
            if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
                return Ok(tokio::task::block_in_place(|| handle.block_on(future)));
            }
            let (tx, rx) = std::sync::mpsc::sync_channel(1);
            std::thread::spawn(move || {
                let result = Runtime::new()
                    .map(|runtime| runtime.block_on(future))
                    .map_err(|err| AwsSetupError::Runtime(err.to_string()));
                let _ = tx.send(result);
            });
            return rx.recv().unwrap_or_else(|_| {
                Err(AwsSetupError::Runtime("aws runtime thread join failed".to_string()))
            });
        }
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| AwsSetupError::Runtime("aws runtime closed".to_string()))?;
        Ok(runtime.block_on(future))
    }
}

impl Drop for AwsRuntime {
    fn drop(&mut self) {
        // Dropping a runtime inside async context panics; hand it to a thread.
        if let Some(runtime) = self.runtime.take() {
            let _ = std::thread::spawn(move || drop(runtime));
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
