pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::config;
use crate::session::SessionStore;

#[derive(Parser)]
#[command(name = "pear")]
#[command(about = "Pear CLI - Inventory client for the Pearmonie API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Auth(commands::auth::AuthCommands),

    #[command(about = "Show the dashboard cards (requires login)")]
    Dashboard,

    #[command(about = "Browse and manage products (requires login)")]
    Products {
        #[command(subcommand)]
        cmd: commands::products::ProductCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let app = config();

    let session = SessionStore::from_config(&app.session);
    let api = ApiClient::new(&app.api, session)?;

    match cli.command {
        Commands::Auth(cmd) => commands::auth::handle(cmd, &api, output_format).await,
        Commands::Dashboard => commands::dashboard::handle(&api, output_format).await,
        Commands::Products { cmd } => {
            commands::products::handle(cmd, api, app.catalog.page_size, output_format).await
        }
    }
}
