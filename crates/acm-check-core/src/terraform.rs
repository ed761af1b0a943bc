// crates/acm-check-core/src/terraform.rs
// ============================================================================
// Module: Terraform Outputs
// Description: Output lookup backed by `terraform output -json`.
// Purpose: Read provisioning outputs once per run with bounded input size.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`TerraformOutputs`] shells out to `terraform output -json` in the module
//! working directory on first lookup and caches the parsed result (including
//! failures) for the rest of the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io;
use std::io::Read;
use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::sync::OnceLock;
use std::thread;

use serde::Deserialize;
use serde_json::Value;

use crate::outputs::OutputError;
use crate::outputs::OutputSource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default Terraform executable.
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";
/// Maximum accepted size of `terraform output -json` stdout.
const MAX_OUTPUT_BYTES: usize = 4 * 1024 * 1024;
/// Maximum stderr kept for error messages.
const MAX_STDERR_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single entry in `terraform output -json`.
#[derive(Debug, Deserialize)]
struct TerraformOutputValue {
    /// Output value.
    value: Value,
}

/// Parsed output map.
type OutputMap = BTreeMap<String, Value>;

/// Terraform-backed output source.
pub struct TerraformOutputs {
    /// Terraform executable.
    binary: PathBuf,
    /// Module working directory.
    working_dir: PathBuf,
    /// Lazily loaded outputs.
    cache: OnceLock<Result<OutputMap, OutputError>>,
}

impl TerraformOutputs {
    /// Creates a source for the module at `working_dir`.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
            cache: OnceLock::new(),
        }
    }

    /// Runs `terraform output -json` and parses the result.
    fn load(&self) -> Result<OutputMap, OutputError> {
        let mut child = Command::new(&self.binary)
            .arg(format!("-chdir={}", self.working_dir.display()))
            .args(["output", "-no-color", "-json"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                OutputError::Command(format!("{}: {err}", self.binary.display()))
            })?;
        let stderr_reader = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || read_limited(stderr, MAX_STDERR_BYTES)));
        let stdout = child.stdout.take().ok_or_else(|| {
            OutputError::Command(format!("{}: stdout unavailable", self.binary.display()))
        })?;
        let stdout = match read_limited(stdout, MAX_OUTPUT_BYTES) {
            Ok(bytes) if bytes.len() <= MAX_OUTPUT_BYTES => bytes,
            Ok(_) => {
                stop_child(&mut child);
                return Err(OutputError::Parse(format!(
                    "terraform output exceeds {MAX_OUTPUT_BYTES} bytes"
                )));
            }
            Err(err) => {
                stop_child(&mut child);
                return Err(OutputError::Command(format!(
                    "{}: failed to read stdout: {err}",
                    self.binary.display()
                )));
            }
        };
        let status = child.wait().map_err(|err| {
            OutputError::Command(format!("{}: {err}", self.binary.display()))
        })?;
        if !status.success() {
            let mut stderr = stderr_reader
                .and_then(|reader| reader.join().ok())
                .and_then(Result::ok)
                .unwrap_or_default();
            stderr.truncate(MAX_STDERR_BYTES);
            return Err(OutputError::Command(format!(
                "{} exited with {status}: {}",
                self.binary.display(),
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        parse_output_json(&stdout)
    }
}

/// Reads at most `limit + 1` bytes so callers can detect overflow.
fn read_limited(reader: impl Read, limit: usize) -> io::Result<Vec<u8>> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    reader.take(cap).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Kills and reaps a child whose output was abandoned.
fn stop_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl OutputSource for TerraformOutputs {
    fn output(&self, key: &str) -> Result<String, OutputError> {
        let outputs = self.cache.get_or_init(|| self.load()).as_ref().map_err(Clone::clone)?;
        output_string(outputs, key)
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses the JSON document printed by `terraform output -json`.
///
/// # Errors
///
/// Returns [`OutputError::Parse`] when the payload is oversized or malformed.
pub(crate) fn parse_output_json(bytes: &[u8]) -> Result<OutputMap, OutputError> {
    if bytes.len() > MAX_OUTPUT_BYTES {
        return Err(OutputError::Parse(format!(
            "terraform output exceeds {MAX_OUTPUT_BYTES} bytes"
        )));
    }
    let raw: BTreeMap<String, TerraformOutputValue> =
        serde_json::from_slice(bytes).map_err(|err| OutputError::Parse(err.to_string()))?;
    Ok(raw.into_iter().map(|(key, entry)| (key, entry.value)).collect())
}

/// Extracts a string output from a parsed map.
fn output_string(outputs: &OutputMap, key: &str) -> Result<String, OutputError> {
    match outputs.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(OutputError::NotString {
            key: key.to_string(),
        }),
        None => Err(OutputError::Missing {
            key: key.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
