// crates/acm-check-cli/src/main.rs
// ============================================================================
// Module: ACM Check CLI Entry Point
// Description: Command dispatcher for ACM certificate validation.
// Purpose: Resolve the region, run the certificate checks, report results.
// Dependencies: clap, acm-check-core, acm-check-config, acm-check-aws
// ============================================================================

//! ## Overview
//! `acm-check` validates a Terraform-provisioned ACM certificate against the
//! expectations in `acm-check.toml`. `run` exits non-zero unless every check
//! passes; `region` prints the region the checks would use; `config validate`
//! checks the configuration file without touching AWS.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use acm_check_aws::AwsAmbientRegion;
use acm_check_aws::AwsRuntime;
use acm_check_aws::AwsSession;
use acm_check_config::AcmCheckConfig;
use acm_check_config::LogConfig;
use acm_check_config::LogSinkKind;
use acm_check_core::CertificateChecker;
use acm_check_core::CheckSuite;
use acm_check_core::FetchMode;
use acm_check_core::FileEventSink;
use acm_check_core::NoopEventSink;
use acm_check_core::OutputSource;
use acm_check_core::ProcessEnv;
use acm_check_core::RegionResolver;
use acm_check_core::ResolvedRegion;
use acm_check_core::StaticOutputs;
use acm_check_core::StderrEventSink;
use acm_check_core::SuiteReport;
use acm_check_core::TerraformOutputs;
use acm_check_core::ValidationEventSink;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "acm-check", version, disable_help_subcommand = true)]
struct Cli {
    /// Configuration file (overrides `ACM_CHECK_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the deployed certificate.
    Run(RunCommand),
    /// Print the resolved AWS region and its source.
    Region,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Terraform module directory (overrides `terraform.working_dir`).
    #[arg(long, value_name = "DIR")]
    terraform_dir: Option<PathBuf>,
    /// Certificate ARN to check instead of reading Terraform outputs.
    #[arg(long, value_name = "ARN")]
    certificate_arn: Option<String>,
    /// Fetch strategy (overrides `run.fetch`).
    #[arg(long, value_enum)]
    fetch: Option<FetchArg>,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
}

/// Fetch strategy flag values.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum FetchArg {
    /// One describe call per check.
    PerCheck,
    /// One describe call shared by all checks.
    Shared,
}

impl From<FetchArg> for FetchMode {
    fn from(value: FetchArg) -> Self {
        match value {
            FetchArg::PerCheck => Self::PerCheck,
            FetchArg::Shared => Self::Shared,
        }
    }
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ReportFormat {
    /// Plain-text summary.
    Text,
    /// Pretty-printed JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = AcmCheckConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    match cli.command {
        Commands::Run(command) => command_run(&config, &command),
        Commands::Region => command_region(&config),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the certificate checks.
fn command_run(config: &AcmCheckConfig, command: &RunCommand) -> CliResult<ExitCode> {
    let events = build_event_sink(&config.log)?;
    let runtime = AwsRuntime::new().map_err(|err| CliError::new(err.to_string()))?;
    let resolved = resolve_region(config, &runtime, Arc::clone(&events))?;
    let session = AwsSession::load_with_region(&runtime, &resolved.region)
        .map_err(|err| CliError::new(err.to_string()))?;
    let checker = CertificateChecker::new(Arc::new(session.acm_client())).with_events(events);
    let report = CheckSuite::new(checker, select_outputs(config, command), resolved)
        .with_expectations(config.expectations())
        .with_fetch_mode(fetch_mode(config, command))
        .with_output_key(&config.certificate.output_key)
        .run();
    write_stdout_line(&render_report(&report, command.format)?)?;
    Ok(if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Prints the resolved region.
fn command_region(config: &AcmCheckConfig) -> CliResult<ExitCode> {
    let events = build_event_sink(&config.log)?;
    let runtime = AwsRuntime::new().map_err(|err| CliError::new(err.to_string()))?;
    let resolved = resolve_region(config, &runtime, events)?;
    write_stdout_line(&format!("{} ({})", resolved.region, resolved.source.describe()))?;
    Ok(ExitCode::SUCCESS)
}

/// Reports that configuration loaded and validated.
fn command_config_validate() -> CliResult<ExitCode> {
    write_stdout_line("config ok")?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the region from the process env, ambient AWS config, then fallback.
fn resolve_region(
    config: &AcmCheckConfig,
    runtime: &AwsRuntime,
    events: Arc<dyn ValidationEventSink>,
) -> CliResult<ResolvedRegion> {
    let fallback = config.fallback_region().map_err(|err| CliError::new(err.to_string()))?;
    Ok(RegionResolver::new(Arc::new(ProcessEnv), Arc::new(AwsAmbientRegion::new(runtime)))
        .with_fallback(fallback)
        .with_events(events)
        .resolve())
}

/// Builds the event sink named by the log configuration.
fn build_event_sink(log: &LogConfig) -> CliResult<Arc<dyn ValidationEventSink>> {
    match (log.sink, &log.path) {
        (LogSinkKind::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (LogSinkKind::None, _) => Ok(Arc::new(NoopEventSink)),
        (LogSinkKind::File, Some(path)) => FileEventSink::new(path)
            .map(|sink| Arc::new(sink) as Arc<dyn ValidationEventSink>)
            .map_err(|err| {
                CliError::new(format!("failed to open log file {}: {err}", path.display()))
            }),
        (LogSinkKind::File, None) => Err(CliError::new("log.path is required".to_string())),
    }
}

/// Picks the certificate ARN source: explicit flag, else Terraform outputs.
fn select_outputs(config: &AcmCheckConfig, command: &RunCommand) -> Arc<dyn OutputSource> {
    if let Some(arn) = &command.certificate_arn {
        return Arc::new(StaticOutputs::new().with(&config.certificate.output_key, arn));
    }
    let working_dir =
        command.terraform_dir.clone().unwrap_or_else(|| config.terraform.working_dir.clone());
    Arc::new(TerraformOutputs::new(&config.terraform.binary, working_dir))
}

/// Returns the fetch mode, preferring the CLI flag.
fn fetch_mode(config: &AcmCheckConfig, command: &RunCommand) -> FetchMode {
    command.fetch.map_or(config.run.fetch, FetchMode::from)
}

/// Renders a report in the requested format.
fn render_report(report: &SuiteReport, format: ReportFormat) -> CliResult<String> {
    match format {
        ReportFormat::Text => Ok(report.render_text()),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|err| CliError::new(format!("failed to encode report: {err}"))),
    }
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "{message}");
    ExitCode::FAILURE
}
