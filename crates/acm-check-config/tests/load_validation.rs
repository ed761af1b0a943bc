//! Config load validation tests for acm-check-config.
// crates/acm-check-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, fields).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use acm_check_config::AcmCheckConfig;
use acm_check_config::ConfigError;
use acm_check_config::LogSinkKind;
use acm_check_core::FetchMode;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<AcmCheckConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(AcmCheckConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        AcmCheckConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(AcmCheckConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config("[certificate]\nexpected_cn = \"example.com\"\n")?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_rejects_empty_san_entry() -> TestResult {
    let file = write_config("[certificate]\nexpected_sans = [\"example.com\", \"  \"]\n")?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "must not contain empty names")
}

#[test]
fn load_rejects_duplicate_sans() -> TestResult {
    let file = write_config("[certificate]\nexpected_sans = [\"a.example.com\", \"a.example.com\"]\n")?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "duplicate a.example.com")
}

#[test]
fn load_rejects_file_sink_without_path() -> TestResult {
    let file = write_config("[log]\nsink = \"file\"\n")?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "log.path is required")
}

#[test]
fn load_rejects_path_for_stderr_sink() -> TestResult {
    let file = write_config("[log]\npath = \"events.jsonl\"\n")?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "log.path is only valid")
}

#[test]
fn load_rejects_blank_fallback_region() -> TestResult {
    let file = write_config("[region]\nfallback = \" \"\n")?;
    assert_invalid(AcmCheckConfig::load(Some(file.path())), "region.fallback must be non-empty")
}

#[test]
fn load_accepts_full_document() -> TestResult {
    let file = write_config(
        r#"
[certificate]
output_key = "acm_certificate_arn"
expected_domain = "api.example.com"
expected_sans = ["api.example.com", "*.api.example.com"]

[region]
fallback = "eu-west-1"

[terraform]
working_dir = "infra/acm"
binary = "tofu"

[run]
fetch = "shared"

[log]
sink = "file"
path = "target/acm-check/events.jsonl"
"#,
    )?;
    let config = AcmCheckConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.certificate.output_key != "acm_certificate_arn" {
        return Err("output_key not applied".to_string());
    }
    if config.expectations().subject_alternative_names.len() != 2 {
        return Err("expected two SANs".to_string());
    }
    if config.run.fetch != FetchMode::Shared {
        return Err("fetch mode not applied".to_string());
    }
    if config.log.sink != LogSinkKind::File {
        return Err("log sink not applied".to_string());
    }
    let fallback = config.fallback_region().map_err(|err| err.to_string())?;
    if fallback.as_str() != "eu-west-1" {
        return Err(format!("unexpected fallback {fallback}"));
    }
    Ok(())
}
