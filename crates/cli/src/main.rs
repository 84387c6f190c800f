mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use warmrun_core::{config, CancelSignal, Config, ReferenceClock};
use warmrun_scheduler::{RunReport, SchedulerBuilder};

use crate::cli::CliArgs;

/// Process exit code for a run that could not start.
const FATAL_EXIT_CODE: i32 = 255;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    config::load_dotenv();
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::from_env(),
    };
    if let Some(threads) = args.threads {
        config.sequential.worker_threads = threads.get();
    }
    config.log_summary();

    let clock = ReferenceClock::starting_in(Duration::from_millis(args.time_zero_in_ms));
    info!(phase = %args.phase, time_zero = %clock.time_zero(), "Reference clock set");

    let scheduler = SchedulerBuilder::new(args.phase)
        .config(&config.sequential)
        .wait_until_time_zero(args.wait_for_time_zero)
        .clock(Arc::new(clock))
        .build_from_trace_file(&args.trace, args.measurements)
        .with_context(|| format!("failed to set up scheduler for {}", args.trace.display()))?;

    let cancel = scheduler.cancel_signal();
    let mut run = tokio::task::spawn_blocking(move || scheduler.run());

    let finished = tokio::select! {
        joined = &mut run => Some(joined),
        signal = tokio::signal::ctrl_c() => {
            handle_interrupt(signal, &cancel);
            None
        }
    };
    let outcome = match finished {
        Some(joined) => joined,
        None => run.await,
    };

    match outcome.context("scheduler task panicked")? {
        Ok(report) => print_report(&report, args.json),
        Err(e) if e.is_fatal() => {
            error!(error = %e, "Fatal scheduler error, terminating.");
            std::process::exit(FATAL_EXIT_CODE);
        }
        Err(e) => Err(e.into()),
    }
}

/// Cancel the run on a delivered Ctrl-C. If the listener could not be
/// installed, the run goes on uninterruptible.
fn handle_interrupt(signal: std::io::Result<()>, cancel: &CancelSignal) {
    match signal {
        Ok(()) => {
            warn!("Interrupt received, cancelling scheduler");
            cancel.cancel();
        }
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C, running to completion");
        }
    }
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        info!(
            phase = %report.phase,
            submitted = report.submitted,
            empty_pulls = report.empty_pulls,
            idle_polls = report.idle_polls,
            peak_in_flight = report.peak_in_flight,
            exit = ?report.exit_reason,
            pool_terminated = report.pool_terminated,
            throughput = report.throughput(),
            "Run complete"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn delivered_interrupt_cancels_run() {
        let cancel = CancelSignal::new();
        handle_interrupt(Ok(()), &cancel);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn listener_failure_does_not_cancel_run() {
        let cancel = CancelSignal::new();
        handle_interrupt(Err(io::Error::new(io::ErrorKind::Other, "no signal driver")), &cancel);
        assert!(!cancel.is_cancelled());
    }
}
