//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::observability::LoggingConfig;

/// Arguments for the costing demo
#[derive(Debug, Parser)]
pub struct ExampleCostingArgs {
    /// Fixture set to load measures & products from
    #[clap(short, long, default_value = "kitchen")]
    pub fixture: String,

    /// Directory containing the `measures/` and `products/` fixture sets
    #[clap(long, env = "LARDER_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Logging
    #[command(flatten)]
    pub logging: LoggingConfig,
}
