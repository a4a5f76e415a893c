// fpscope - Client network-fingerprint correlation engine
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use fpscope::db::{Config, DatabaseConfig, InMemoryObservationStore, ObservationStore};
use fpscope::ingest::{IngestionFilter, ObservationIngestor};
use fpscope::{Args, CapturedRequest, CorrelationEngine, IngestOutcome};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    args.validate()?;

    if !args.has_action() {
        Args::command().print_help()?;
        return Ok(());
    }

    // Handle --api-config-example (generate API config example and exit)
    if let Some(config_path) = &args.api_server.config_example {
        use fpscope::api::ApiConfig;
        ApiConfig::create_example(
            config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Invalid file path"))?,
        )?;
        println!("✓ Example API configuration saved to: {}", config_path.display());
        return Ok(());
    }

    // Handle --db-config-example (generate example config and exit)
    if let Some(config_path) = &args.database.config_example {
        DatabaseConfig::create_example_config(
            config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Invalid file path"))?,
        )?;
        println!("✓ Example database configuration saved to: {}", config_path.display());
        return Ok(());
    }

    // Load configuration; CLI flags override the file
    let mut config = match &args.database.config {
        Some(path) => DatabaseConfig::from_file(
            path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Invalid config file path"))?,
        )?,
        None => Config::default(),
    };
    config.capture.log_ips |= args.log_ips;
    if let Some(top_k) = args.query.top_k {
        config.capture.top_k = top_k;
    }

    let store: Arc<dyn ObservationStore> = if args.database.config.is_some() {
        fpscope::db::open_store(&config.database).await?
    } else {
        if args.database.init {
            anyhow::bail!("--db-init requires --db-config");
        }
        info!("No --db-config given; observations are kept in memory");
        Arc::new(InMemoryObservationStore::new())
    };

    if args.database.init {
        println!("✓ Database initialized successfully");
    }

    // Handle --ingest
    if let Some(path) = &args.ingest {
        let content = std::fs::read_to_string(path)?;
        let captures = CapturedRequest::many_from_json(&content)?;
        let ingestor =
            ObservationIngestor::new(store.clone(), IngestionFilter::new(config.capture.log_ips));

        let (mut stored, mut duplicate, mut rejected, mut failed) = (0usize, 0usize, 0usize, 0usize);
        for capture in &captures {
            match ingestor.record(capture).await {
                IngestOutcome::Stored { .. } => stored += 1,
                IngestOutcome::Duplicate => duplicate += 1,
                IngestOutcome::Rejected { .. } => rejected += 1,
                IngestOutcome::Failed { .. } => failed += 1,
            }
        }

        println!(
            "{} Processed {} capture(s) from {}",
            "✓".green(),
            captures.len(),
            path.display()
        );
        println!("  {} stored", stored.to_string().green());
        println!("  {} duplicate", duplicate.to_string().yellow());
        println!("  {} rejected", rejected.to_string().yellow());
        if failed > 0 {
            println!("  {} failed", failed.to_string().red());
        }
    }

    let engine = CorrelationEngine::with_top_k(store.clone(), config.capture.top_k);

    // Handle --by-* lookups
    if let Some((dimension, value)) = args.query.lookup() {
        let correlation = engine.lookup(dimension, value).await;
        let json = if args.json_pretty {
            serde_json::to_string_pretty(&correlation)?
        } else {
            serde_json::to_string(&correlation)?
        };
        println!("{}", json);
    }

    // Handle --count
    if args.query.count {
        let total = engine.count_all().await;
        if total < 0 {
            eprintln!("{} Failed to count observations", "✗".red());
        }
        println!("{}", total);
    }

    // Handle --serve (start API server mode)
    if args.api_server.enable {
        use fpscope::api::{ApiConfig, ApiServer};

        info!("Starting fpscope in API server mode");

        let mut api_config = if let Some(config_path) = &args.api_server.config {
            ApiConfig::from_file(
                config_path
                    .to_str()
                    .ok_or_else(|| anyhow::anyhow!("Invalid config file path"))?,
            )?
        } else {
            ApiConfig::default()
        };

        if let Some(host) = &args.api_server.host {
            api_config.host = host.clone();
        }
        if let Some(port) = args.api_server.port {
            api_config.port = port;
        }
        if args.api_server.no_swagger {
            api_config.enable_swagger = false;
        }

        let server = ApiServer::new(api_config, store, &config.capture);
        server.run().await?;
    }

    Ok(())
}
