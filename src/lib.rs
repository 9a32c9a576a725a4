pub mod args;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod items;
pub mod publish;
pub mod source;
pub mod syntax;

pub use args::{BuildArgs, Cli, Commands, PipeArgs};
pub use cache::{CacheStore, MemoryCache, DEFAULT_TTL};
pub use compiler::{compile, BREAKPOINTS};
pub use config::PanelConfig;
pub use errors::{PanelError, Result};
pub use items::{extract_items, Item};
pub use publish::{inline_items_script, inline_style, Manifest, ManifestBuilder};
pub use source::{SourceFile, SourceLocator};

use std::path::PathBuf;
use std::time::Duration;

const ITEMS_CACHE_NAMESPACE: &str = "helpers_items";
const CSS_CACHE_NAMESPACE: &str = "helpers_css";
const PRECOMPILED_CACHE_NAMESPACE: &str = "helpers_css_precompiled";

/// Result of a build run
#[derive(Debug)]
pub struct BuildResult {
    pub items: Vec<Item>,
    pub css_content: String,
    /// Inline script assigning the item list to the configured window global
    pub items_script: String,
    /// Inline style element wrapping the compiled CSS, absent when empty
    pub style_tag: Option<String>,
    pub manifest: serde_json::Value,
    pub source_path: Option<PathBuf>,
    pub items_from_cache: bool,
    pub css_from_cache: bool,
}

/// Main build entry point: resolve the stylesheet, derive both artifacts
/// and write any requested output files. A single run gets a fresh cache;
/// long-running hosts should use [`build_with_cache`] to keep one across
/// invocations.
pub async fn build(args: BuildArgs) -> Result<BuildResult> {
    let cache = MemoryCache::new();
    build_with_cache(args, &cache).await
}

/// Build with an injected artifact cache, keyed by source path and
/// modification time.
pub async fn build_with_cache(args: BuildArgs, cache: &dyn CacheStore) -> Result<BuildResult> {
    // Validate arguments
    args.validate().map_err(PanelError::InvalidInput)?;

    let config = load_config(&args)?;
    let locator = SourceLocator::from_config(&config.source);

    if args.verbose {
        eprintln!("Starting helpers panel build...");
        for candidate in locator.candidates() {
            eprintln!("  candidate: {}", candidate.display());
        }
    }

    // A missing stylesheet is not an error: empty item list, empty CSS.
    let source = locator.read();
    if args.verbose {
        match &source {
            Some(src) => eprintln!("Using stylesheet: {} ({} lines)", src.path.display(), src.lines.len()),
            None => eprintln!("No helpers stylesheet found; emitting empty artifacts"),
        }
    }

    let (items, items_from_cache) = match &source {
        Some(src) => cached_items(src, &config, cache),
        None => (Vec::new(), false),
    };

    // A pre-compiled CSS file shipped with the module wins over SCSS
    // compilation; the item list still comes from the SCSS source.
    let precompiled = locator.precompiled_candidate();
    let (css_content, css_from_cache) = match &precompiled {
        Some(path) => {
            if args.verbose {
                eprintln!("Using pre-compiled CSS: {}", path.display());
            }
            cached_precompiled(path, &config, cache)
        }
        None => match &source {
            Some(src) => cached_css(src, &config, cache),
            None => (String::new(), false),
        },
    };

    let source_path = source.map(|src| src.path).or(precompiled);

    let mut manifest_builder = ManifestBuilder::new()
        .with_items(&items)
        .with_from_cache(items_from_cache && css_from_cache);
    if let Some(path) = &source_path {
        manifest_builder = manifest_builder.with_source_path(path.display().to_string());
    }
    let manifest = manifest_builder.build(&css_content).to_json();

    let items_script = inline_items_script(&items, &config.output.items_global)?;
    let style_tag = inline_style(&css_content, &config.output.style_element_id);

    let result = BuildResult {
        items,
        css_content,
        items_script,
        style_tag,
        manifest,
        source_path,
        items_from_cache,
        css_from_cache,
    };

    if !args.dry_run {
        write_output_files(&args, &result)?;
    }

    if args.verbose {
        eprintln!("\nBuild complete:");
        eprintln!("  - {} panel items", result.items.len());
        eprintln!("  - {} bytes of CSS", result.css_content.len());
        eprintln!(
            "  - cache: items {}, css {}",
            if result.items_from_cache { "hit" } else { "miss" },
            if result.css_from_cache { "hit" } else { "miss" }
        );
    }

    Ok(result)
}

/// Load the config file if given and fold the CLI overrides into it.
fn load_config(args: &BuildArgs) -> Result<PanelConfig> {
    let mut config = match &args.config {
        Some(path) => PanelConfig::from_file(path)?,
        None => PanelConfig::default(),
    };

    if let Some(dir) = &args.module_dir {
        config.source.module_dir = dir.clone();
    }
    if let Some(dir) = &args.legacy_dir {
        config.source.legacy_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.theme_dir {
        config.source.theme_dir = Some(dir.clone());
    }
    if let Some(path) = &args.source {
        config.source.override_path = Some(path.clone());
    }
    if let Some(ttl) = args.ttl {
        config.cache.ttl_secs = ttl;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    Ok(config)
}

fn cached_items(
    src: &SourceFile,
    config: &PanelConfig,
    cache: &dyn CacheStore,
) -> (Vec<Item>, bool) {
    let key = cache::entry_key(ITEMS_CACHE_NAMESPACE, &src.path, src.modified);
    if config.cache.enabled {
        if let Some(raw) = cache.get(&key) {
            if let Ok(items) = serde_json::from_str(&raw) {
                return (items, true);
            }
        }
    }

    let items = extract_items(&src.lines);
    if config.cache.enabled {
        if let Ok(raw) = serde_json::to_string(&items) {
            cache.set(&key, raw, Duration::from_secs(config.cache.ttl_secs));
        }
    }
    (items, false)
}

fn cached_css(src: &SourceFile, config: &PanelConfig, cache: &dyn CacheStore) -> (String, bool) {
    let key = cache::entry_key(CSS_CACHE_NAMESPACE, &src.path, src.modified);
    if config.cache.enabled {
        if let Some(css) = cache.get(&key) {
            return (css, true);
        }
    }

    let css = compile(&src.lines);
    if config.cache.enabled {
        cache.set(&key, css.clone(), Duration::from_secs(config.cache.ttl_secs));
    }
    (css, false)
}

/// Serve a pre-compiled CSS file, reading it only on a cache miss. A file
/// that disappears between the existence check and the read yields empty
/// CSS, like any other unreadable source.
fn cached_precompiled(
    path: &std::path::Path,
    config: &PanelConfig,
    cache: &dyn CacheStore,
) -> (String, bool) {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
    let key = cache::entry_key(PRECOMPILED_CACHE_NAMESPACE, path, modified);
    if config.cache.enabled {
        if let Some(css) = cache.get(&key) {
            return (css, true);
        }
    }

    let css = std::fs::read_to_string(path).unwrap_or_default();
    if config.cache.enabled {
        cache.set(&key, css.clone(), Duration::from_secs(config.cache.ttl_secs));
    }
    (css, false)
}

/// Write the requested artifacts with atomic writes
fn write_output_files(args: &BuildArgs, result: &BuildResult) -> Result<()> {
    if let Some(path) = &args.output_css {
        write_atomic(path, &result.css_content).map_err(|e| PanelError::OutputError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }

    if let Some(path) = &args.output_items {
        let json = if args.compact {
            serde_json::to_string(&result.items)?
        } else {
            serde_json::to_string_pretty(&result.items)?
        };
        write_atomic(path, &json).map_err(|e| PanelError::OutputError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }

    if let Some(path) = &args.output_manifest {
        let json = if args.compact {
            serde_json::to_string(&result.manifest)?
        } else {
            serde_json::to_string_pretty(&result.manifest)?
        };
        write_atomic(path, &json).map_err(|e| PanelError::OutputError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }

    Ok(())
}

/// Write file atomically by writing to temp file then renaming
fn write_atomic<P: AsRef<std::path::Path>>(path: P, content: &str) -> std::io::Result<()> {
    use std::fs;
    use std::io::Write;

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    // Append to the full file name so same-stem outputs get distinct
    // temp paths (x.css.tmp vs x.json.tmp).
    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    // Write to temporary file
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?; // Ensure data is flushed to disk

    // Atomically rename temp file to final name
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Handle pipe command - read stylesheet source from stdin, write one
/// artifact to stdout
pub async fn handle_pipe_command(args: PipeArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    // Read stylesheet content from stdin asynchronously
    let mut input = String::new();
    let mut stdin = io::stdin();
    stdin
        .read_to_string(&mut input)
        .await
        .map_err(|e| PanelError::InputError(format!("Failed to read from stdin: {}", e)))?;

    // Empty input produces empty output
    if input.trim().is_empty() {
        return Ok(());
    }

    let lines: Vec<&str> = input.lines().collect();
    let output = if args.items {
        let items = extract_items(&lines);
        if args.compact {
            serde_json::to_string(&items)?
        } else {
            serde_json::to_string_pretty(&items)?
        }
    } else {
        compile(&lines)
    };

    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_bytes())
        .await
        .map_err(|e| PanelError::OutputError {
            path: "stdout".to_string(),
            message: e.to_string(),
        })?;

    // Ensure output is flushed
    stdout.flush().await.map_err(|e| PanelError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}
