use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Helpers Panel CLI - derives the editor panel item list and compiled CSS
/// from a helpers stylesheet
#[derive(Parser, Debug)]
#[command(name = "helpers-extractor-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the helpers stylesheet and derive both artifacts
    Build(BuildArgs),
    /// Process stylesheet content from stdin and write one artifact to stdout
    Pipe(PipeArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Explicit stylesheet path
    #[arg(
        short = 's',
        long = "source",
        value_name = "PATH",
        help = "Stylesheet path overriding the lookup chain"
    )]
    pub source: Option<PathBuf>,

    /// Module directory searched first
    #[arg(
        long = "module-dir",
        value_name = "DIR",
        help = "Module directory holding assets/scss/<file>"
    )]
    pub module_dir: Option<PathBuf>,

    /// Legacy plugin directory fallback
    #[arg(
        long = "legacy-dir",
        value_name = "DIR",
        help = "Old plugin directory kept for backwards compatibility"
    )]
    pub legacy_dir: Option<PathBuf>,

    /// Theme directory fallback
    #[arg(
        long = "theme-dir",
        value_name = "DIR",
        help = "Theme root searched through its utility subdirectories"
    )]
    pub theme_dir: Option<PathBuf>,

    /// Output CSS file path
    #[arg(
        short = 'o',
        long = "output-css",
        value_name = "PATH",
        help = "Path where the compiled CSS will be written"
    )]
    pub output_css: Option<PathBuf>,

    /// Output item-list file path (JSON)
    #[arg(
        short = 'i',
        long = "output-items",
        value_name = "PATH",
        help = "Path where the panel item list JSON will be written"
    )]
    pub output_items: Option<PathBuf>,

    /// Output manifest file path (JSON)
    #[arg(
        short = 'm',
        long = "output-manifest",
        value_name = "PATH",
        help = "Path where the build manifest JSON will be written"
    )]
    pub output_manifest: Option<PathBuf>,

    /// Configuration file path (YAML or JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Cache entry time-to-live in seconds
    #[arg(
        long = "ttl",
        value_name = "SECS",
        help = "Cache entry time-to-live in seconds"
    )]
    pub ttl: Option<u64>,

    /// Skip the artifact cache
    #[arg(
        long = "no-cache",
        default_value_t = false,
        help = "Derive artifacts without consulting the cache"
    )]
    pub no_cache: bool,

    /// Compact JSON output
    #[arg(
        long = "compact",
        default_value_t = false,
        help = "Write compact JSON instead of pretty-printed"
    )]
    pub compact: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Dry run (don't write output files)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Derive artifacts but don't write output files"
    )]
    pub dry_run: bool,
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// Emit the item list instead of compiled CSS
    #[arg(
        long = "items",
        default_value_t = false,
        help = "Write the panel item list JSON instead of compiled CSS"
    )]
    pub items: bool,

    /// Compact JSON output
    #[arg(
        long = "compact",
        default_value_t = false,
        help = "Write compact JSON instead of pretty-printed"
    )]
    pub compact: bool,
}

impl BuildArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        // Output paths must be pairwise distinct
        let outputs = [&self.output_css, &self.output_items, &self.output_manifest];
        for (i, a) in outputs.iter().enumerate() {
            for b in outputs.iter().skip(i + 1) {
                if let (Some(a), Some(b)) = (a, b) {
                    if a == b {
                        return Err(format!(
                            "Output paths must be different, got '{}' twice",
                            a.display()
                        ));
                    }
                }
            }
        }

        if self.ttl == Some(0) {
            return Err("Cache TTL must be at least 1 second".to_string());
        }

        Ok(())
    }
}
