mod cli;
mod error;
mod output;

use clap::{CommandFactory, ValueEnum};
use tracing_subscriber::EnvFilter;

use panbulk_core::{XmlApiConnector, provision, selector_for};

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Any argument at all: print usage and do nothing else.
    if std::env::args_os().nth(1).is_some() {
        print_usage();
        return;
    }

    if let Err(err) = run().await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn print_usage() {
    let mut cmd = Cli::command();
    println!("{}", cmd.render_long_help());
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), CliError> {
    let cfg = panbulk_config::load_config()?;
    init_tracing(&cfg.log_level);
    tracing::debug!(path = %panbulk_config::config_path().display(), "config loaded");

    let format = <OutputFormat as ValueEnum>::from_str(&cfg.output, true).map_err(|_| {
        CliError::Validation {
            field: "output".into(),
            reason: format!("expected table, json, or yaml, got '{}'", cfg.output),
        }
    })?;

    let config = panbulk_config::to_provision_config(&cfg)?;
    let selector = selector_for(&config);
    let report = provision(&config, &XmlApiConnector, selector.as_ref()).await?;

    output::print_output(&output::render_report(format, &report)?);
    Ok(())
}
