use std::path::Path;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::store::Pokemon;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));

            if let Some(Value::Object(extra)) = data {
                response.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary used by `list`
pub fn pokemon_line(pokemon: &Pokemon) -> String {
    let favorite = if pokemon.is_favorite { " ★" } else { "" };
    let types = if pokemon.types.is_empty() {
        String::new()
    } else {
        format!(" [{}]", pokemon.types.join("/"))
    };
    format!("#{:<4} {}{}{}", pokemon.id, pokemon.name.english, types, favorite)
}

/// Multi-line detail view used by `show` and mutations
pub fn pokemon_details(pokemon: &Pokemon) -> String {
    let mut out = vec![pokemon_line(pokemon)];
    if let Some(french) = &pokemon.name.french {
        out.push(format!("  French:     {}", french));
    }
    if let Some(japanese) = &pokemon.name.japanese {
        out.push(format!("  Japanese:   {}", japanese));
    }

    let base = &pokemon.base;
    out.push(format!(
        "  HP {}  Attack {}  Defense {}  Speed {}",
        base.hp, base.attack, base.defense, base.speed
    ));
    if base.sp_attack.is_some() || base.sp_defense.is_some() {
        out.push(format!(
            "  Sp. Attack {}  Sp. Defense {}",
            stat(base.sp_attack),
            stat(base.sp_defense)
        ));
    }
    if let Some(image) = &pokemon.image {
        out.push(format!("  Image:      {}", image));
    }
    out.join("\n")
}

fn stat(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

/// Read a JSON document from a file, or stdin when the path is `-`
pub fn read_json_input(path: &Path) -> anyhow::Result<Value> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?
    };

    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path.display(), e))
}
