//! CLI entry point for the libris catalog queries.
//!
//! Query subcommands write a JSON result to stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use libris_core::config::{LibrisConfig, LoggingConfig};
use libris_query::{http, write_json, CatalogService};
use libris_store::{StoreClient, StoreConfig};

#[derive(Parser)]
#[command(name = "libris")]
#[command(about = "Read queries over the Libris library catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the database URL from config.
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Config file prefix (default: libris).
    #[arg(short, long, default_value = "libris", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Print every book with its author and the author's books.
    Books,
    /// Print every author with its books.
    Authors,
    /// Print every user with its reading list.
    Users,
    /// Serve the queries over HTTP.
    Serve {
        /// Listen address (overrides server.bind).
        #[arg(long)]
        bind: Option<String>,
    },
    /// Create the catalog tables if they are missing.
    InitSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = LibrisConfig::load(&cli.config, cli.database_url.as_deref())?;
    init_tracing(&config.logging);
    tracing::debug!(
        config = %cli.config,
        max_connections = config.database.max_connections,
        "Loaded configuration"
    );

    let store = StoreClient::connect(&StoreConfig::from(&config.database)).await?;
    let service = CatalogService::new(store.clone());

    match cli.command {
        Command::Books => write_json(std::io::stdout().lock(), &service.all_books().await?)?,
        Command::Authors => write_json(std::io::stdout().lock(), &service.all_authors().await?)?,
        Command::Users => write_json(std::io::stdout().lock(), &service.all_users().await?)?,
        Command::Serve { ref bind } => {
            let bind = bind.as_deref().unwrap_or(&config.server.bind);
            http::serve(service, bind).await?;
        }
        Command::InitSchema => store.ensure_schema().await?,
    }

    store.close().await;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
