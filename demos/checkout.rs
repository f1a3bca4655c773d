//! Checkout Example
//!
//! Loads a fixture set, searches for the cheapest deal ordering and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to specify the number of items to add to the basket
//! Use `-l` to set the log level and `--log-format` to pick compact or json output
//! (`RUST_LOG` takes precedence over `-l`)
//!
//! Run with: `cargo run --example checkout -- -f cross_item`

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use checkout::{
    fixtures::Fixture,
    receipt::Receipt,
    solvers::{Solver, permutation::PermutationSolver},
    utils::{ExampleCheckoutArgs, LogFormat},
};

fn init_logging(args: &ExampleCheckoutArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    match args.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    init_logging(&args);

    let fixture = Fixture::from_set(&args.fixture)?;

    let basket = fixture.basket(args.n)?;
    let deals = fixture.deals();

    let start = Instant::now();

    let result = PermutationSolver::solve(deals, &basket)?;

    let elapsed = start.elapsed();

    info!(
        orderings = result.orderings_evaluated,
        total_minor = result.total.to_minor_units(),
        "checkout complete"
    );

    for app in result.applications.iter().filter(|app| app.is_repriced()) {
        debug!(
            item_idx = app.item_idx,
            bundle_id = app.bundle_id,
            savings_minor = app.savings()?.to_minor_units(),
            "deal applied"
        );
    }

    let receipt = Receipt::from_solver_result(&basket, result)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle, &basket, deals)?;

    println!(
        "\nSavings: {} ({:.2}%)",
        receipt.savings()?,
        receipt.savings_percent_points()?
    );
    println!("Solution: {}", elapsed.human(Truncate::Nano));

    Ok(())
}
