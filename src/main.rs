//! # Jira Exporter CLI
//!
//! Fetches Jira issues with their workflow timestamps given a defined
//! workflow and writes them to a CSV file.
//!
//! ## Usage
//!
//! ```bash
//! # Export issues using a YAML configuration
//! jx --config conf/default.yaml --output export/issues.csv
//!
//! # Pick a log verbosity (the log file lands next to the CSV output)
//! jx -c conf/default.yaml -o export/issues.csv -l info
//! ```
//!
//! Connection details missing from the configuration file (domain, username,
//! API token) are prompted for interactively before the first request.

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result, bail};
use clap::Parser;
use jirex::{
    ExporterConfig, IssueParser, JiraClient,
    cli::{Cli, LogLevel},
    export, ui,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        tracing::error!("Unexpected error: {error:#}\nScript has been canceled.");
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    validate_paths(&cli)?;
    init_logging(&cli)?;

    ui::show_stage("Process YAML config file...");
    let mut config = ExporterConfig::from_yaml_file(&cli.config)?;
    ui::show_done();

    prompt_missing_credentials(&mut config)?;

    let client = JiraClient::new(config.domain(), config.username(), config.api_token())?;
    let parser = IssueParser::new(&config, &client);

    ui::show_stage("Fetch issues from Jira...");
    let issues = parser.fetch_issues().await?;
    ui::show_done();

    ui::show_stage("Parse fetched Jira issues...");
    let records = parser.parse_issues(&issues).await?;
    ui::show_done();

    ui::show_stage(&format!("Write CSV output file to '{}'.", cli.output.display()));
    export::write_csv(&cli.output, &export::csv_columns(&config), &records)?;
    ui::show_done();

    Ok(())
}

/// Fail early on unusable paths instead of after the Jira round trips.
fn validate_paths(cli: &Cli) -> Result<()> {
    if !cli.config.is_file() {
        bail!("Configuration file '{}' does not exist.", cli.config.display());
    }

    if cli.output.is_dir() {
        bail!("Output path '{}' is a directory, not a file.", cli.output.display());
    }

    let parent = match cli.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        bail!("Directory '{}' does not exist for output file '{}'.", parent.display(), cli.output.display());
    }

    if cli.output.exists() {
        let metadata = cli.output.metadata().context("Failed to inspect output file")?;
        if metadata.permissions().readonly() {
            bail!("Output file '{}' is not writable.", cli.output.display());
        }
    }

    Ok(())
}

/// Send tracing output to `<output>.log`, or disable logging entirely.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = match cli.loglevel {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        LogLevel::Off => {
            ui::show_logging_disabled();
            return Ok(());
        }
    };

    let log_location = cli.output.with_extension("log");
    let log_file = File::create(&log_location)
        .with_context(|| format!("Failed to create log file '{}'", log_location.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    tracing::debug!("Logging to file enabled");
    Ok(())
}

/// Ask for connection details the YAML configuration left empty.
fn prompt_missing_credentials(config: &mut ExporterConfig) -> Result<()> {
    if !config.domain().is_empty() && !config.username().is_empty() && !config.api_token().is_empty() {
        return Ok(());
    }

    ui::show_connection_prompt_header();

    if config.domain().is_empty() {
        let domain = ui::prompts::prompt_domain()?;
        config.set_domain(&domain)?;
    }
    if config.username().is_empty() {
        let username = ui::prompts::prompt_username()?;
        config.set_username(&username);
    }
    if config.api_token().is_empty() {
        let api_token = ui::prompts::prompt_api_token()?;
        config.set_api_token(&api_token);
    }

    Ok(())
}
