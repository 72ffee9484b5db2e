//! Sequencer runtime entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use oracle_telemetry::{init_telemetry, TelemetryConfig};
use sequencer_runtime::{Cli, SequencerRuntime};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _telemetry = match init_telemetry(TelemetryConfig::from_env()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize telemetry: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[runtime] Fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve().context("failed to load configuration")?;
    let runtime = SequencerRuntime::new(config)?;
    let shutdown = runtime.shutdown_handle();

    let mut handle = tokio::spawn(runtime.run());

    info!("[runtime] Running. Press Ctrl+C to stop.");
    let finished = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("[runtime] Interrupt received, shutting down");
            let _ = shutdown.send(true);
            None
        }
        result = &mut handle => Some(result),
    };

    let result = match finished {
        Some(result) => result,
        None => handle.await,
    };
    result.context("runtime task panicked")?
}
