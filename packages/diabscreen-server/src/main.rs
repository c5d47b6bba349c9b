//! diabscreen CLI
//!
//! # Usage
//!
//! ```bash
//! # REST backend on :3000 with the in-memory store
//! diabscreen serve
//!
//! # SQLite-backed, custom port
//! diabscreen serve --store sqlite --db data/diabscreen.db --port 8080
//!
//! # One-off classification
//! diabscreen classify --strategy proportional G01 G02 G06
//!
//! # Effective configuration
//! diabscreen config --config diabscreen.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use diabscreen_core::config::Validatable;
use diabscreen_core::{
    RiskClassifier, ScoringStrategy, ServerConfig, StoreBackend, SymptomObservation,
};
use diabscreen_server::{http, store, telemetry, AppState};

#[derive(Parser)]
#[command(name = "diabscreen")]
#[command(about = "Diabetes risk screening expert system", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST backend
    Serve {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Store backend (memory or sqlite)
        #[arg(long)]
        store: Option<StoreBackend>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Scoring strategy (proportional or rule_based)
        #[arg(long)]
        strategy: Option<ScoringStrategy>,
    },

    /// Classify symptom codes and print the result as JSON
    Classify {
        /// Scoring strategy
        #[arg(short, long, default_value = "rule_based")]
        strategy: ScoringStrategy,

        /// Declared symptom count (proportional scoring)
        #[arg(long)]
        count: Option<usize>,

        /// Symptom codes, e.g. G01 G02
        codes: Vec<String>,
    },

    /// Print the effective configuration as YAML
    Config {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            store: backend,
            db,
            strategy,
        } => {
            telemetry::init();
            let mut config = ServerConfig::load(config.as_deref())
                .context("failed to load configuration")?;

            if let Some(port) = port {
                config.http.port = port;
                config.track_cli("http.port", "--port");
            }
            if let Some(backend) = backend {
                config.store.backend = backend;
                config.track_cli("store.backend", "--store");
            }
            if let Some(path) = db {
                config.store.path = Some(path);
                config.track_cli("store.path", "--db");
            }
            if let Some(strategy) = strategy {
                config.strategy = strategy;
                config.track_cli("strategy", "--strategy");
            }
            config.validate().context("invalid configuration")?;
            info!(sources = %config.provenance().summary(), "configuration loaded");

            let store = store::open(&config.store).context("failed to open store")?;
            http::serve(AppState::new(store, config))
                .await
                .context("server error")?;
        }
        Commands::Classify {
            strategy,
            count,
            codes,
        } => {
            let mut observation = SymptomObservation::new(codes);
            if let Some(count) = count {
                observation = observation.with_declared_count(count);
            }
            let result = RiskClassifier::new(strategy).classify(&observation);
            println!("{}", serde_json::to_string_pretty(&result)?);
            eprintln!("{}", result.summary());
        }
        Commands::Config { config } => {
            let config = ServerConfig::load(config.as_deref())
                .context("failed to load configuration")?;
            print!("{}", config.to_yaml()?);
            eprintln!("# {}", config.provenance().summary());
        }
    }

    Ok(())
}
