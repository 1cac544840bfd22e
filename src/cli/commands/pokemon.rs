use std::path::Path;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::cli::client::{ClientError, PokedexClient};
use crate::cli::commands::auth::session_client;
use crate::cli::utils::{output_json, output_success, pokemon_details, pokemon_line, read_json_input};
use crate::cli::OutputFormat;
use crate::store::Pokemon;

pub async fn list(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let pokemons = PokedexClient::new(url)?.list().await?;

    match output_format {
        OutputFormat::Json => output_json(&pokemons),
        OutputFormat::Text => {
            if pokemons.is_empty() {
                println!("No pokemons in the catalog");
            }
            for pokemon in &pokemons {
                println!("{}", pokemon_line(pokemon));
            }
            Ok(())
        }
    }
}

pub async fn show(url: &str, id: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let pokemon = PokedexClient::new(url)?.get(id).await?;
    print_pokemon(&pokemon, &output_format)
}

pub async fn create(url: &str, file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let record = read_json_input(file)?;
    let pokemon = session_client(url)?.create(&record).await?;

    tracing::debug!("Created pokemon {}", pokemon.id);
    print_pokemon(&pokemon, &output_format)
}

pub async fn update(url: &str, id: i64, file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let record = read_json_input(file)?;
    let pokemon = session_client(url)?.update(id, &record).await?;
    print_pokemon(&pokemon, &output_format)
}

pub async fn delete(url: &str, id: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    session_client(url)?.delete(id).await?;
    output_success(
        &output_format,
        &format!("Pokemon {} deleted", id),
        Some(json!({ "id": id })),
    )
}

pub async fn favorite(url: &str, id: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let pokemon = session_client(url)?.toggle_favorite(id).await?;

    match output_format {
        OutputFormat::Json => output_json(&pokemon),
        OutputFormat::Text => {
            let state = if pokemon.is_favorite { "added to" } else { "removed from" };
            println!("✓ {} {} favorites", pokemon.name.english, state);
            Ok(())
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub created: usize,
    pub conflicts: usize,
    pub failed: usize,
}

/// Posts every record of a JSON array; existing ids are counted, not fatal.
pub async fn import(url: &str, file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let records = match read_json_input(file)? {
        Value::Array(records) => records,
        _ => anyhow::bail!("{} must contain a JSON array of pokemons", file.display()),
    };

    let client = session_client(url)?;
    let mut summary = ImportSummary::default();

    for (index, record) in records.iter().enumerate() {
        match client.create(record).await {
            Ok(pokemon) => {
                tracing::debug!("Imported pokemon {}", pokemon.id);
                summary.created += 1;
            }
            Err(e) if e.status() == Some(StatusCode::CONFLICT) => summary.conflicts += 1,
            Err(ClientError::NotLoggedIn) => return Err(ClientError::NotLoggedIn.into()),
            Err(e) => {
                eprintln!("Record {}: {}", index, e);
                summary.failed += 1;
            }
        }
    }

    output_success(
        &output_format,
        &format!(
            "Imported {} pokemons ({} already present, {} failed)",
            summary.created, summary.conflicts, summary.failed
        ),
        Some(json!({
            "created": summary.created,
            "conflicts": summary.conflicts,
            "failed": summary.failed,
        })),
    )
}

fn print_pokemon(pokemon: &Pokemon, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(pokemon),
        OutputFormat::Text => {
            println!("{}", pokemon_details(pokemon));
            Ok(())
        }
    }
}
