//! runsim - headless replay verification
//!
//! Reads one replay from stdin, re-runs it, and prints exactly one JSON result
//! line on stdout. Logs go to stderr. The exit code mirrors the outcome.

use clap::Parser;
use replay_harness::replay::read_replay;
use replay_harness::{encode, game::VerbosityLevel, Harness, HarnessOptions};
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit code for invalid command-line usage (EX_USAGE)
const EXIT_USAGE: u8 = 64;
/// Exit code when stdin cannot be read (EX_IOERR)
const EXIT_IO_ERROR: u8 = 74;
/// Exit code for failures outside the pipeline (EX_SOFTWARE)
const EXIT_SOFTWARE: u8 = 70;

/// Verbosity level for run output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser, Debug)]
#[command(name = "runsim")]
#[command(
    about = "Headless replay verification: reads a replay on stdin, prints one JSON result line",
    long_about = None
)]
struct Cli {
    /// Wall-clock budget for the simulation, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Enable debug logging (verbose run log on stderr)
    #[arg(long)]
    debug: bool,

    /// Accept replays with a zero levelgen checksum (testing only)
    #[arg(long)]
    trust: bool,

    /// Verbosity level (silent/0, minimal/1, normal/2, verbose/3)
    #[arg(long, short = 'v', default_value = "minimal")]
    verbosity: VerbosityArg,

    /// Record a state hash every N ticks into the result
    #[arg(long, value_name = "TICKS", value_parser = clap::value_parser!(u64).range(1..))]
    trace_every: Option<u64>,

    /// Run N replicas in parallel and require identical results
    #[arg(long, value_name = "N", default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..=64))]
    replicas: u64,
}

fn init_tracing(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    // Usage errors must not share an exit code with any run outcome
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let verbosity = if cli.debug {
        VerbosityLevel::Verbose
    } else {
        cli.verbosity.into()
    };
    init_tracing(verbosity);

    let input = match read_replay(std::io::stdin().lock()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("runsim: failed to read replay from stdin: {e}");
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };

    let options = HarnessOptions {
        timeout: Duration::from_secs(cli.timeout),
        trust_override: cli.trust,
        verbosity,
        trace_every: cli.trace_every,
        replicas: cli.replicas as usize,
        ..HarnessOptions::default()
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("runsim: failed to start runtime: {e}");
            return ExitCode::from(EXIT_SOFTWARE);
        }
    };

    let harness = Harness::new(options);
    let outcome = runtime.block_on(harness.run_bytes(&input));
    // A timed-out simulation thread may still be running; do not wait for it
    runtime.shutdown_background();

    let encoded = match encode(&outcome) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("runsim: {e}");
            return ExitCode::from(EXIT_SOFTWARE);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout
        .write_all(&encoded)
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        eprintln!("runsim: failed to write result: {e}");
        return ExitCode::from(EXIT_IO_ERROR);
    }

    ExitCode::from(outcome.exit_code())
}
