// CLI module - Command line interface and argument parsing
// Licensed under GPL-3.0

use clap::Parser;
use std::path::PathBuf;

// Sub-modules for organized CLI arguments
mod api_server_args;
mod database_args;
mod query_args;

// Re-export sub-structs
pub use api_server_args::ApiServerArgs;
pub use database_args::DatabaseArgs;
pub use query_args::QueryArgs;

/// fpscope - Client network-fingerprint correlation engine
///
/// The Args struct composes the domain-specific sub-structs:
/// - Record store (DatabaseArgs)
/// - REST API server (ApiServerArgs)
/// - One-shot lookups (QueryArgs)
/// - Capture ingestion and output flags
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, long_about = None)]
#[command(name = "fpscope")]
#[command(about = "Client network-fingerprint correlation engine", long_about = None)]
pub struct Args {
    // ============ Database Operations ============
    #[command(flatten)]
    pub database: DatabaseArgs,

    // ============ REST API Server ============
    #[command(flatten)]
    pub api_server: ApiServerArgs,

    // ============ Correlation Lookups ============
    #[command(flatten)]
    pub query: QueryArgs,

    // ============ Capture Ingestion ============
    /// Ingest captured requests from a JSON file (one object or an array)
    #[arg(long = "ingest", value_name = "FILE")]
    pub ingest: Option<PathBuf>,

    /// Record the client IP of admitted captures
    #[arg(long = "log-ips")]
    pub log_ips: bool,

    // ============ Output ============
    /// Pretty print JSON output
    #[arg(long = "json-pretty")]
    pub json_pretty: bool,
}

impl Args {
    /// Validate CLI arguments for mutual exclusivity and logical consistency
    ///
    /// Returns an error if conflicting flags are used together
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.query.lookups().len() > 1 {
            anyhow::bail!(
                "Only one of --by-ja3, --by-h2, --by-peetprint and --by-user-agent may be given."
            );
        }

        if self.api_server.enable && self.query.lookup().is_some() {
            anyhow::bail!("Cannot combine --serve with a --by-* lookup.");
        }

        if self.query.top_k == Some(0) {
            anyhow::bail!("--top-k must be at least 1.");
        }

        Ok(())
    }

    /// Whether any action was requested
    pub fn has_action(&self) -> bool {
        self.api_server.enable
            || self.api_server.config_example.is_some()
            || self.database.init
            || self.database.config_example.is_some()
            || self.ingest.is_some()
            || self.query.lookup().is_some()
            || self.query.count
    }
}
