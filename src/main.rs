use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crlcheck::config::{Config, load_config, setup_http_client};
use crlcheck::error::ErrorEnvelope;
use crlcheck::target_source::fetch_targets;
use crlcheck::{Checker, RunOutput, telemetry};

/// Checks that CRL distribution points are reachable and reports the results to New Relic.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Overrides the execution time budget of the batch, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    max_execution_secs: Option<u64>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Check the targets of the published target list
    Pull {
        /// Target list URL, instead of the configured one
        #[arg(long, value_name = "URL")]
        source_url: Option<String>,
    },
    /// Check the targets of a JSON payload: {"urls": [...], "eventType": ..., "type": ...}
    Push {
        /// The payload itself
        #[arg(long, conflicts_with = "file")]
        payload: Option<String>,

        /// A file holding the payload; stdin is read when neither is given
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print the published target list, as validated, without checking anything
    List {
        /// Target list URL, instead of the configured one
        #[arg(long, value_name = "URL")]
        source_url: Option<String>,
    },
}

fn read_payload(payload: Option<String>, file: Option<PathBuf>) -> std::io::Result<String> {
    match (payload, file) {
        (Some(payload), _) => Ok(payload),
        (None, Some(path)) => std::fs::read_to_string(path),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

async fn list_targets(config: &Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.targets.fetch_timeout_seconds);
    let client = setup_http_client(timeout)?;

    let (document, code) = match fetch_targets(&client, &config.targets.source_url).await {
        Ok(request) => (serde_json::to_string_pretty(&request)?, ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list targets");
            let envelope = ErrorEnvelope::from(&e);
            (serde_json::to_string_pretty(&envelope)?, ExitCode::FAILURE)
        }
    };
    println!("{document}");
    Ok(code)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    let args = Args::parse();

    let mut config = load_config()?;
    if let Some(secs) = args.max_execution_secs {
        config.probe.max_execution_seconds = secs;
    }

    let output = match args.mode {
        Mode::Pull { source_url } => {
            if let Some(url) = source_url {
                config.targets.source_url = url;
            }
            Checker::from_config(config)?.run_pull().await
        }
        Mode::Push { payload, file } => {
            let payload = read_payload(payload, file)?;
            Checker::from_config(config)?.run_push(&payload).await
        }
        Mode::List { source_url } => {
            if let Some(url) = source_url {
                config.targets.source_url = url;
            }
            return list_targets(&config).await;
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(match output {
        RunOutput::Results(_) => ExitCode::SUCCESS,
        RunOutput::Error(_) => ExitCode::FAILURE,
    })
}
