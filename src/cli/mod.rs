pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Pokédex CLI - Command-line client for the Pokédex catalog API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "POKEDEX_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the API server"
    )]
    pub url: String,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create a user account")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "POKEDEX_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Log in and save the token for later commands")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "POKEDEX_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the saved token")]
    Logout,

    #[command(about = "List every pokemon in the catalog")]
    List,

    #[command(about = "Show one pokemon")]
    Show {
        #[arg(help = "Pokemon id")]
        id: i64,
    },

    #[command(about = "Create a pokemon from a JSON file (- for stdin)")]
    Create {
        #[arg(help = "Path to the JSON record")]
        file: PathBuf,
    },

    #[command(about = "Replace a pokemon from a JSON file (- for stdin)")]
    Update {
        #[arg(help = "Pokemon id")]
        id: i64,
        #[arg(help = "Path to the JSON record")]
        file: PathBuf,
    },

    #[command(about = "Delete a pokemon")]
    Delete {
        #[arg(help = "Pokemon id")]
        id: i64,
    },

    #[command(about = "Toggle the favorite flag of a pokemon")]
    Favorite {
        #[arg(help = "Pokemon id")]
        id: i64,
    },

    #[command(about = "Create every pokemon of a JSON array file")]
    Import {
        #[arg(help = "Path to a JSON array of records")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
    let url = cli.url.as_str();

    match &cli.command {
        Commands::Register { username, password } => {
            commands::auth::register(url, username, password, output_format).await
        }
        Commands::Login { username, password } => {
            commands::auth::login(url, username, password, output_format).await
        }
        Commands::Logout => commands::auth::logout(output_format).await,
        Commands::List => commands::pokemon::list(url, output_format).await,
        Commands::Show { id } => commands::pokemon::show(url, *id, output_format).await,
        Commands::Create { file } => commands::pokemon::create(url, file, output_format).await,
        Commands::Update { id, file } => {
            commands::pokemon::update(url, *id, file, output_format).await
        }
        Commands::Delete { id } => commands::pokemon::delete(url, *id, output_format).await,
        Commands::Favorite { id } => commands::pokemon::favorite(url, *id, output_format).await,
        Commands::Import { file } => commands::pokemon::import(url, file, output_format).await,
    }
}
