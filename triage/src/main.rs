#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod report;

use args::{Args, Command};
use clap::Parser;
use triage_config::Config;
use triage_core::{Classify, ErrorKind, Opaque, ServiceError};
use triage_grpc::StatusConverter;
use triage_http::ProblemConverter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args.log);

    let config = match &args.config {
        Some(path) => {
            tracing::info!(config_path = %path.display(), "loading configuration");
            Config::load(path)?
        }
        None => Config::default(),
    };

    let grpc = StatusConverter::new(triage_grpc::config_from(&config.grpc));
    let http = ProblemConverter::new(triage_http::config_from(&config.http));

    match args.command {
        Command::Check => {
            print!("{}", report::chain(grpc.matchers()));
            print!("{}", report::chain(http.matchers()));
        }
        Command::Explain {
            kind,
            message,
            violations,
        } => {
            let err = sample_error(kind, message, violations);
            let out = report::explain(&grpc, &http, err.as_ref())?;
            print!("{out}");
        }
    }

    Ok(())
}

/// Error to convert, opaque unless a kind or violations were given
fn sample_error(kind: Option<ErrorKind>, message: String, violations: Vec<(String, String)>) -> Box<dyn Classify> {
    if kind.is_none() && violations.is_empty() {
        return Box::new(Opaque(std::io::Error::other(message)));
    }

    let err = match kind {
        Some(kind) => ServiceError::with_kind(kind, message),
        None => ServiceError::new(message),
    };

    Box::new(
        violations
            .into_iter()
            .fold(err, |err, (field, violation)| err.with_violation(field, violation)),
    )
}

/// Install the fmt subscriber with the given filter
fn init_logging(filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
