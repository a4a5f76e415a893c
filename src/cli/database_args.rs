// Database configuration arguments
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Record store configuration
///
/// Without `--db-config` observations live in memory for the lifetime of
/// the process.
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database configuration file (TOML format)
    #[arg(long = "db-config", value_name = "FILE", id = "db_config")]
    pub config: Option<PathBuf>,

    /// Initialize database (create tables and run migrations)
    #[arg(long = "db-init")]
    pub init: bool,

    /// Generate example database configuration file
    #[arg(
        long = "db-config-example",
        value_name = "FILE",
        id = "db_config_example"
    )]
    pub config_example: Option<PathBuf>,
}
