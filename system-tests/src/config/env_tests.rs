// system-tests/src/config/env_tests.rs
// ============================================================================
// Module: System Test Env Unit Tests
// Description: Unit coverage for strict environment parsing in system-tests.
// Purpose: Ensure configuration parsing fails closed on invalid inputs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Unit coverage for strict environment parsing in system-tests.
//! Invariants:
//! - Environment parsing rejects invalid or empty values.
//! - Tests restore environment state after each run.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::OnceLock;

use super::DEFAULT_TERRAFORM_DIR;
use super::SystemTestConfig;
use super::SystemTestEnv;

mod env_mut {
    #![allow(unsafe_code, reason = "Tests mutate process env vars in a controlled scope.")]

    /// Sets an environment variable for the current process.
    pub fn set_var(key: &str, value: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    /// Removes an environment variable from the current process.
    pub fn remove_var(key: &str) {
        // SAFETY: Tests serialize environment mutation via a global lock.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("env lock poisoned")
}

struct EnvGuard {
    entries: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn new(names: &[&'static str]) -> Self {
        let entries = names.iter().map(|name| (*name, std::env::var(*name).ok())).collect();
        for name in names {
            env_mut::remove_var(name);
        }
        Self {
            entries,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.entries.drain(..) {
            match value {
                Some(value) => env_mut::set_var(name, &value),
                None => env_mut::remove_var(name),
            }
        }
    }
}

fn env_names() -> [&'static str; 3] {
    [
        SystemTestEnv::RunRoot.as_str(),
        SystemTestEnv::TerraformDir.as_str(),
        SystemTestEnv::CertificateArn.as_str(),
    ]
}

#[test]
fn unset_env_uses_defaults() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    let config = SystemTestConfig::load().expect("config should load");
    assert_eq!(config, SystemTestConfig::default());
    assert_eq!(config.terraform_dir, PathBuf::from(DEFAULT_TERRAFORM_DIR));
}

#[test]
fn overrides_are_applied() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    env_mut::set_var(SystemTestEnv::TerraformDir.as_str(), "/tmp/module");
    env_mut::set_var(
        SystemTestEnv::CertificateArn.as_str(),
        " arn:aws:acm:us-west-2:111122223333:certificate/abc ",
    );
    let config = SystemTestConfig::load().expect("config should load");
    assert_eq!(config.terraform_dir, PathBuf::from("/tmp/module"));
    assert_eq!(
        config.certificate_arn.as_deref(),
        Some("arn:aws:acm:us-west-2:111122223333:certificate/abc")
    );
}

#[test]
fn certificate_arn_rejects_non_arn_values() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    env_mut::set_var(SystemTestEnv::CertificateArn.as_str(), "certificate/abc");
    assert!(SystemTestConfig::load().is_err());
}

#[test]
fn empty_values_fail_closed() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&env_names());

    env_mut::set_var(SystemTestEnv::RunRoot.as_str(), "");
    assert!(SystemTestConfig::load().is_err());

    env_mut::remove_var(SystemTestEnv::RunRoot.as_str());
    env_mut::set_var(SystemTestEnv::TerraformDir.as_str(), "   ");
    assert!(SystemTestConfig::load().is_err());
}
