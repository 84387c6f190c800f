use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use warmrun_core::Phase;

/// Replay a benchmark trace as fast as a bounded worker pool allows.
///
/// Business processes are pulled from the trace in order and submitted
/// without regard to their timestamps. At most `--threads` run at once.
#[derive(Parser, Debug)]
#[command(name = "warmrun", about = "Sequential trace dispatcher for benchmark phases")]
pub struct CliArgs {
    /// Trace file, one JSON business process per line
    #[arg(long)]
    pub trace: PathBuf,

    /// Benchmark phase: preload, warmup, experiment or cleanup
    #[arg(long, default_value = "warmup")]
    pub phase: Phase,

    /// Worker pool size, at least 1 (overrides config and SEQUENTIAL_THREADS)
    #[arg(long)]
    pub threads: Option<NonZeroUsize>,

    /// Emit per-operation measurement log lines
    #[arg(long)]
    pub measurements: bool,

    /// Hold the first submission until time zero
    #[arg(long)]
    pub wait_for_time_zero: bool,

    /// Time zero, in milliseconds from now
    #[arg(long, default_value = "0")]
    pub time_zero_in_ms: u64,

    /// TOML config file (default: environment variables)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
