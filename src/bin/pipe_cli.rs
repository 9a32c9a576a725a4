//! Helpers panel CLI with items and compile modes
//!
//! This CLI provides two distinct modes:
//! 1. items - Read stylesheet source from stdin, output the panel item list JSON to stdout
//! 2. compile - Read stylesheet source from stdin, output compiled CSS to stdout
//!
//! Both modes can additionally write a metadata JSON file describing the run.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use helpers_extractor::{compile, extract_items, Item};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "helpers-extractor-cli")]
#[command(about = "Helpers stylesheet extractor and compiler CLI", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the panel item list from stylesheet source
    Items {
        /// Path to write metadata JSON file
        #[arg(long = "metadata", value_name = "PATH")]
        metadata_output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Compile stylesheet source to CSS
    Compile {
        /// Path to write metadata JSON file
        #[arg(long = "metadata", value_name = "PATH")]
        metadata_output: Option<PathBuf>,
    },
}

/// Metadata format describing one pipe run
#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    /// Which artifact was produced ("items" or "css")
    mode: String,
    /// Number of items in the list (items mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "itemCount")]
    item_count: Option<usize>,
    /// Compiled CSS size in bytes (compile mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "cssBytes")]
    css_bytes: Option<usize>,
    /// ISO timestamp of processing
    #[serde(rename = "processedAt")]
    processed_at: String,
    /// Crate version
    version: String,
    /// Statistics about the input
    stats: Stats,
}

#[derive(Debug, Serialize, Deserialize)]
struct Stats {
    /// Count of input lines
    #[serde(rename = "lineCount")]
    line_count: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Items {
            metadata_output,
            compact,
        } => handle_items_mode(metadata_output, compact),
        Commands::Compile { metadata_output } => handle_compile_mode(metadata_output),
    }
}

/// Items mode: read stylesheet from stdin, write the item list JSON to stdout
fn handle_items_mode(metadata_output: Option<PathBuf>, compact: bool) -> Result<()> {
    let lines = read_stdin()?;
    let line_count = lines.len();

    let items: Vec<Item> = extract_items(&lines);

    let json = if compact {
        serde_json::to_string(&items).context("Failed to serialize item list")?
    } else {
        serde_json::to_string_pretty(&items).context("Failed to serialize item list")?
    };

    io::stdout()
        .write_all(json.as_bytes())
        .context("Failed to write item list to stdout")?;

    if let Some(path) = metadata_output {
        let metadata = Metadata {
            mode: "items".to_string(),
            item_count: Some(items.len()),
            css_bytes: None,
            processed_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stats: Stats { line_count },
        };
        write_metadata(&path, &metadata)?;
    }

    Ok(())
}

/// Compile mode: read stylesheet from stdin, write compiled CSS to stdout
fn handle_compile_mode(metadata_output: Option<PathBuf>) -> Result<()> {
    let lines = read_stdin()?;
    let line_count = lines.len();

    let css = compile(&lines);

    io::stdout()
        .write_all(css.as_bytes())
        .context("Failed to write CSS to stdout")?;

    if let Some(path) = metadata_output {
        let metadata = Metadata {
            mode: "css".to_string(),
            item_count: None,
            css_bytes: Some(css.len()),
            processed_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stats: Stats { line_count },
        };
        write_metadata(&path, &metadata)?;
    }

    Ok(())
}

fn read_stdin() -> Result<Vec<String>> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stylesheet from stdin")?;
    Ok(input.lines().map(str::to_string).collect())
}

fn write_metadata(path: &PathBuf, metadata: &Metadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    fs::write(path, json).with_context(|| format!("Failed to write metadata to {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serialization() {
        let metadata = Metadata {
            mode: "items".to_string(),
            item_count: Some(12),
            css_bytes: None,
            processed_at: "2024-01-01T00:00:00Z".to_string(),
            version: "3.0.0".to_string(),
            stats: Stats { line_count: 40 },
        };

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"itemCount\":12"));
        assert!(!json.contains("cssBytes"));

        let parsed: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.item_count, Some(12));
        assert_eq!(parsed.stats.line_count, 40);
    }
}
