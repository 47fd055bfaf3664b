use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rolodex_core::RolodexConfig;
use rolodex_server::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rolodex", version, about = "Rolodex CRM admin backend")]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(long, env = "ROLODEX_CONFIG")]
    config: Option<PathBuf>,

    /// Database URL, e.g. sqlite:crm.db.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Token signing secret.
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Bind address override.
        #[arg(long)]
        host: Option<String>,

        /// Bind port override.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Populate the database with sample users, clients, and
    /// commissions.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RolodexConfig::from_file(path)?,
        None => RolodexConfig::default(),
    };
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Some(secret) = cli.secret {
        config.auth.secret = secret;
    }

    match cli.cmd {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            server::serve(config).await
        }
        Command::Seed => server::seed_database(config).await,
    }
}
