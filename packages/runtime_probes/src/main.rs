//! Runs diagnostic probes that observe implementation-defined behavior of the Rust runtime and
//! standard library, describing each observation on standard output.
//!
//! # Usage
//!
//! ```text
//! runtime_probes [--probe <NAME>]... [--list]
//! ```
//!
//! Without `--probe`, every probe runs in catalog order. Failures of individual probes are
//! logged on standard error and do not stop the run. Set `RUST_LOG=debug` to see each probe
//! start and finish.

use std::alloc::System;
use std::io::{self, Write};
use std::process::ExitCode;

use alloc_watch::CountingAllocator;
use argh::FromArgs;
use runtime_probes::{Context, catalog, run_probes, select};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static ALLOCATOR: CountingAllocator<System> = CountingAllocator::system();

/// Runs diagnostic probes that observe implementation-defined behavior of the Rust runtime.
#[derive(FromArgs)]
struct Args {
    /// name of a probe to run, may be repeated; all probes run if none is given
    #[argh(option)]
    probe: Vec<String>,

    /// list the available probes instead of running them
    #[argh(switch)]
    list: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr so they never mix with the observations on stdout.
    _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg_attr(test, mutants::skip)] // Entry point, exercised by running the binary.
fn main() -> ExitCode {
    init_tracing();

    let args: Args = argh::from_env();

    if args.list {
        let mut stdout = io::stdout();

        for probe in catalog() {
            if writeln!(stdout, "{} - {}", probe.name(), probe.summary()).is_err() {
                return ExitCode::FAILURE;
            }
        }

        return ExitCode::SUCCESS;
    }

    let probes = match select(&args.probe) {
        Ok(probes) => probes,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout();
    let mut ctx = Context::new(ALLOCATOR.counters(), &mut stdout);

    let summary = run_probes(&mut ctx, &probes);

    if summary.failed() > 0 {
        tracing::warn!(
            failed = summary.failed(),
            succeeded = summary.succeeded(),
            "some probes failed"
        );
    }

    // Probe failures are reported in the log but do not fail the run.
    ExitCode::SUCCESS
}
