//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The configuration input file name. Type must be YAML.
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// The output file name. The output file will be a CSV file.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Logging verbosity, written to a .log file next to the output
    #[arg(short, long, value_enum, default_value = "debug")]
    pub loglevel: LogLevel,
}

/// Log verbosity levels, most verbose first
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose
    Debug,
    Info,
    Warning,
    Error,
    /// Least verbose
    Critical,
    /// Completely disabled
    Off,
}
