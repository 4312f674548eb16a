use std::path::PathBuf;

use clap::{Parser, Subcommand};
use triage_core::ErrorKind;

/// Triage error conversion inspector
#[derive(Debug, Parser)]
#[command(name = "triage", about = "Inspect how errors become gRPC statuses and HTTP problems")]
pub struct Args {
    /// Path to configuration file, built-in chains when omitted
    #[arg(short, long, env = "TRIAGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive
    #[arg(long, default_value = "warn", env = "TRIAGE_LOG", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the configuration and list the resolved matcher chains
    Check,

    /// Convert a sample error through both surfaces
    Explain {
        /// Kind of the sample error, unclassified when omitted
        #[arg(short, long)]
        kind: Option<ErrorKind>,

        /// Message carried by the sample error
        #[arg(short, long, default_value = "example failure")]
        message: String,

        /// Field violation as `field=message`, repeatable
        #[arg(long = "violation", value_parser = parse_violation)]
        violations: Vec<(String, String)>,
    },
}

fn parse_violation(raw: &str) -> Result<(String, String), String> {
    let (field, message) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `field=message`, got `{raw}`"))?;

    if field.is_empty() {
        return Err(format!("violation `{raw}` has an empty field name"));
    }

    Ok((field.to_owned(), message.to_owned()))
}
