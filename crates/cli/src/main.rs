//! # Ferrous Lookup
//!
//! Cached DNS lookups from the command line

use clap::{Parser, Subcommand};
use ferrous_lookup_domain::config::StoreBackend;
use ferrous_lookup_domain::{CliOverrides, RecordType};
use tracing::info;

mod bootstrap;
mod commands;
mod di;
mod output;

#[derive(Parser)]
#[command(name = "ferrous-lookup")]
#[command(version)]
#[command(about = "DNS lookups backed by a shared TTL-aware cache")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Cache store backend (sqlite, memory, disabled)
    #[arg(long)]
    store_backend: Option<StoreBackend>,

    /// Cache store URL
    #[arg(long)]
    store_url: Option<String>,

    /// Upstream DNS server (repeatable)
    #[arg(long = "upstream")]
    upstream: Vec<String>,

    /// Lifetime of negative cache entries, in seconds
    #[arg(long)]
    negative_ttl: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up records, answering from the cache when possible
    Lookup {
        #[arg(required = true)]
        domains: Vec<String>,

        /// Record type
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: RecordType,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what the cache holds for a domain
    Inspect {
        domain: String,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        store_backend: cli.store_backend,
        store_url: cli.store_url,
        upstream_servers: cli.upstream,
        negative_ttl_secs: cli.negative_ttl,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);
    bootstrap::config::log_config(cli.config.as_deref(), &config);

    let store = bootstrap::init_store(&config.store).await;
    let use_cases = di::UseCases::new(&config, store)?;

    match cli.command {
        Command::Lookup {
            domains,
            record_type,
            json,
        } => {
            info!(count = domains.len(), record_type = %record_type, "Running lookups");
            commands::lookup(&use_cases, &domains, record_type, json).await
        }
        Command::Inspect { domain, json } => commands::inspect(&use_cases, &domain, json).await,
    }
}
