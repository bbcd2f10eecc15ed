//! Costing Example
//!
//! Loads a fixture set and prints the costing of every product in it.
//!
//! Use `-f` to load a fixture set by name
//! Use `--fixtures-dir` to point at a different fixtures directory
//! Use `--log-format json` for structured logs on stderr

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use larder::{
    fixtures::Fixture, observability::init_subscriber, report::CostingReport,
    utils::ExampleCostingArgs,
};

/// Costing Example
pub fn main() -> Result<()> {
    let args = ExampleCostingArgs::parse();

    init_subscriber(&args.logging)?;

    let fixture = Fixture::from_set_in(&args.fixtures_dir, &args.fixture)?;

    let start = Instant::now();

    let report = CostingReport::from_products(fixture.products(), fixture.measures());

    let elapsed = start.elapsed();

    info!(
        fixture = %args.fixture,
        products = report.rows().len(),
        costed = report.costed().count(),
        "costed fixture set"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report.write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
