use crate::errors::{PanelError, Result};
use crate::source::DEFAULT_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Where to look for the helpers stylesheet
    pub source: SourceConfig,

    /// Artifact caching
    pub cache: CacheConfig,

    /// Names used when publishing assets to the page
    pub output: OutputConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            cache: CacheConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Stylesheet lookup chain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Module directory holding `assets/scss/<file_name>`
    pub module_dir: PathBuf,

    /// Old plugin location kept for backwards compatibility
    pub legacy_dir: Option<PathBuf>,

    /// Theme root searched through its utility subdirectories
    pub theme_dir: Option<PathBuf>,

    /// Stylesheet file name looked up in every candidate directory
    pub file_name: String,

    /// Explicit path replacing the candidate chain entirely
    pub override_path: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            module_dir: PathBuf::from("."),
            legacy_dir: None,
            theme_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            override_path: None,
        }
    }
}

/// Artifact cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Consult the cache before re-deriving artifacts
    pub enabled: bool,

    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
        }
    }
}

/// Published asset naming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `id` attribute of the injected inline style element
    pub style_element_id: String,

    /// Window global the item list is assigned to
    pub items_global: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            style_element_id: "helpers-panel-inline".to_string(),
            items_global: "HELPERS_PANEL_ITEMS".to_string(),
        }
    }
}

impl PanelConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PanelError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PanelError::ConfigError {
            message: format!("Failed to parse YAML config: {}", e),
        })
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PanelError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| PanelError::ConfigError {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(PanelError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Merge with another configuration; `other` wins where it sets
    /// anything non-default.
    pub fn merge(mut self, other: Self) -> Self {
        let source_defaults = SourceConfig::default();
        if other.source.module_dir != source_defaults.module_dir {
            self.source.module_dir = other.source.module_dir;
        }
        if other.source.file_name != source_defaults.file_name {
            self.source.file_name = other.source.file_name;
        }
        if other.source.legacy_dir.is_some() {
            self.source.legacy_dir = other.source.legacy_dir;
        }
        if other.source.theme_dir.is_some() {
            self.source.theme_dir = other.source.theme_dir;
        }
        if other.source.override_path.is_some() {
            self.source.override_path = other.source.override_path;
        }

        let cache_defaults = CacheConfig::default();
        if other.cache.enabled != cache_defaults.enabled {
            self.cache.enabled = other.cache.enabled;
        }
        if other.cache.ttl_secs != cache_defaults.ttl_secs {
            self.cache.ttl_secs = other.cache.ttl_secs;
        }

        let output_defaults = OutputConfig::default();
        if other.output.style_element_id != output_defaults.style_element_id {
            self.output.style_element_id = other.output.style_element_id;
        }
        if other.output.items_global != output_defaults.items_global {
            self.output.items_global = other.output.items_global;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.source.file_name, "helpers.scss");
        assert!(config.source.override_path.is_none());
    }

    #[test]
    fn test_yaml_config_loading() {
        let yaml_content = r##"
source:
  module_dir: "./module"
  theme_dir: "./theme"
  file_name: "studiolsm-helpers.scss"
cache:
  enabled: false
  ttl_secs: 60
"##;

        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let config = PanelConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.source.module_dir, PathBuf::from("./module"));
        assert_eq!(config.source.theme_dir, Some(PathBuf::from("./theme")));
        assert_eq!(config.source.file_name, "studiolsm-helpers.scss");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 60);
        // Untouched sections keep their defaults
        assert_eq!(config.output.items_global, "HELPERS_PANEL_ITEMS");
    }

    #[test]
    fn test_json_config_loading() {
        let json_content = r##"{
  "source": {"override_path": "./custom/helpers.scss"},
  "output": {"items_global": "PANEL_ITEMS"}
}"##;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let config = PanelConfig::from_json_file(file.path()).unwrap();
        assert_eq!(
            config.source.override_path,
            Some(PathBuf::from("./custom/helpers.scss"))
        );
        assert_eq!(config.output.items_global, "PANEL_ITEMS");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".toml").unwrap();
        assert!(PanelConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut base = PanelConfig::default();
        base.source.module_dir = PathBuf::from("./base-module");

        let mut other = PanelConfig::default();
        other.source.theme_dir = Some(PathBuf::from("./theme"));
        other.cache.ttl_secs = 120;

        let merged = base.merge(other);
        assert_eq!(merged.source.module_dir, PathBuf::from("./base-module"));
        assert_eq!(merged.source.theme_dir, Some(PathBuf::from("./theme")));
        assert_eq!(merged.cache.ttl_secs, 120);
    }
}
