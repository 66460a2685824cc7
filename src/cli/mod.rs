pub mod commands;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Parser)]
#[command(name = "filmes")]
#[command(about = "Filmes CLI - database administration for the Filmes API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,

    #[command(about = "Load sample users, movies and ratings into an empty database")]
    Seed,

    #[command(about = "Remove leftover filmes-test-*.db files")]
    Cleanup {
        #[arg(long, default_value = "data", help = "Directory to clean")]
        dir: std::path::PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Print a command result either as pretty JSON or via its text form.
    pub fn print<T: Serialize + std::fmt::Display>(&self, value: &T) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => println!("{}", value),
        }
        Ok(())
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    match cli.command {
        Commands::Migrate => {
            let db = Database::connect(&config.database).await?;
            let result = commands::migrate::handle(&db, &config).await;
            db.close().await;
            output_format.print(&result?)
        }
        Commands::Seed => {
            let db = Database::connect(&config.database).await?;
            db.migrate().await?;
            let result = commands::seed::handle(&db, config.security.bcrypt_cost).await;
            db.close().await;
            output_format.print(&result?)
        }
        Commands::Cleanup { dir } => output_format.print(&commands::cleanup::handle(&dir)?),
    }
}
