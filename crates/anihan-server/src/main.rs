//! Anihan command line.
//!
//! Commands:
//! - `anihan serve` - Run the REST API
//! - `anihan seed` - Reset the database to the demo data set
//! - `anihan config` - Print the effective configuration

use anihan_market::Market;
use anihan_server::config::{generate_default_config, ServerConfig};
use anihan_server::logging::init_tracing;
use anihan_server::seed::seed;
use anihan_server::serve;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Anihan - food waste marketplace server
#[derive(Parser)]
#[command(name = "anihan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file path (default: nearest anihan.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Log filter, e.g. `debug` or `info,sqlx=warn`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API
    Serve(ServeArgs),

    /// Clear every table and load the demo data set
    Seed,

    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Write a default anihan.toml to the current directory
    #[arg(long)]
    init: bool,

    /// Overwrite an existing file with --init
    #[arg(long)]
    force: bool,
}

impl Cli {
    /// File, then environment, then flags.
    fn load_config(&self) -> Result<ServerConfig> {
        let mut config = ServerConfig::discover(self.config.as_deref())?.with_env()?;
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json {
            config.logging.format = anihan_server::config::LogFormat::Json;
        }
        if let Commands::Serve(args) = &self.command {
            if let Some(host) = &args.host {
                config.server.host = host.clone();
            }
            if let Some(port) = args.port {
                config.server.port = port;
            }
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    match cli.command {
        Commands::Serve(_) => {
            init_tracing(&config.logging)?;
            serve(config).await
        }
        Commands::Seed => {
            init_tracing(&config.logging)?;
            let db = anihan_db::Db::open(&config.database.url)
                .await
                .with_context(|| format!("Failed to open database {}", config.database.url))?;
            let summary = seed(&Market::new(db.clone())).await?;
            db.close().await;
            println!("Database seeded: {}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Commands::Config(args) => {
            if args.init {
                let path = PathBuf::from("anihan.toml");
                if path.exists() && !args.force {
                    anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
                }
                std::fs::write(&path, generate_default_config())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            } else {
                print!("{}", config.to_toml()?);
            }
            Ok(())
        }
    }
}
