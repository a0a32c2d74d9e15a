//! CLI for the vcfetch HTTP client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use vcfetch_core::config::{self, LayeredConfig, MapSource};
use vcfetch_core::report::{ErrorReporter, StderrReporter};
use vcfetch_core::retry::RetryError;

use commands::{run_get, run_policy, GetArgs};

/// Top-level CLI for vcfetch.
#[derive(Debug, Parser)]
#[command(name = "vcfetch")]
#[command(about = "vcfetch: fetch over HTTP with rate-limit aware retries", long_about = None)]
pub struct Cli {
    /// Set a config value for this invocation, e.g. `-c http.maxRetries=3`.
    #[arg(short = 'c', value_name = "KEY=VALUE", global = true)]
    pub config_overrides: Vec<String>,

    /// Read configuration from FILE instead of the XDG config directory.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL, retrying on 429 Too Many Requests per the resolved policy.
    Get {
        /// HTTP/HTTPS URL to fetch.
        url: String,

        /// Write the body to FILE instead of stdout.
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Extra request header, `Name: value`. Repeatable.
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Send HEAD instead of GET and print the response headers.
        #[arg(long)]
        head: bool,
    },

    /// Print the resolved retry policy.
    Policy,
}

/// Config layers for this invocation: `-c` overrides above the config file.
pub(crate) fn load_config(overrides: &[String], file: Option<&Path>) -> Result<LayeredConfig> {
    let overrides = MapSource::from_overrides(overrides)?;
    let persisted = match file {
        Some(path) => config::load_file(path)?,
        None => config::load_default()?,
    };
    Ok(LayeredConfig::new()
        .with_layer(overrides)
        .with_layer(persisted))
}

impl CliCommand {
    pub fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();
        let cfg = load_config(&cli.config_overrides, cli.config_file.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        let mut reporter = StderrReporter::stderr();
        // Resolved once, before any request.
        let policy = match config::resolve_policy(&cfg) {
            Ok(policy) => policy,
            Err(err) => {
                reporter.report(RetryError::from(err));
                return Ok(ExitCode::FAILURE);
            }
        };

        match cli.command {
            CliCommand::Get {
                url,
                output,
                headers,
                head,
            } => {
                let args = GetArgs {
                    url,
                    output,
                    headers,
                    head,
                };
                run_get(&policy, &args, &mut reporter)
            }
            CliCommand::Policy => {
                run_policy(&policy)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
