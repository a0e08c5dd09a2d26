use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use casefile::cli::{correlate, delete, discover, import, list, show, stats};
use casefile::config::Config;
use casefile::store::SqliteStore;

#[derive(Parser)]
#[command(name = "casefile")]
#[command(about = "Forensic document analysis record store and correlation engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "casefile.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Import analysis records from a JSON file
    Import {
        /// Path to a JSON file holding one record or an array of records
        json: PathBuf,
    },

    /// List stored records
    List {
        /// Filter by status (pending, processing, completed, error)
        #[arg(short, long)]
        status: Option<String>,

        /// Maximum rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one record in full
    Show {
        /// Record ID
        id: String,
    },

    /// Rank other records by correlation strength with a target record
    Discover {
        /// Target record ID
        id: String,

        /// Maximum results to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Aggregate per-entity signal across all records
    Correlate {
        /// Maximum entities to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete a record
    Delete {
        /// Record ID
        id: String,
    },

    /// Show statistics over the stored record set
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    // Initialize store
    let store = SqliteStore::open(&config.database_path())?;

    match cli.command {
        Commands::Import { json } => {
            import::run(&store, &json).await?;
        }
        Commands::List { status, limit } => {
            let limit = limit.unwrap_or(config.display.list_limit);
            list::run(&store, status, limit).await?;
        }
        Commands::Show { id } => {
            show::run(&store, &id).await?;
        }
        Commands::Discover { id, limit } => {
            let limit = limit.unwrap_or(config.display.ranking_limit);
            discover::run(&store, &id, limit).await?;
        }
        Commands::Correlate { limit } => {
            let limit = limit.unwrap_or(config.display.ranking_limit);
            correlate::run(&store, limit).await?;
        }
        Commands::Delete { id } => {
            delete::run(&store, &id).await?;
        }
        Commands::Stats => {
            stats::run(&store).await?;
        }
    }

    Ok(())
}
