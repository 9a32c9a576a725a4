//! Asset publishing: turn the derived artifacts into the snippets the
//! hosting page injects, plus a build manifest describing the run.

use crate::errors::Result;
use crate::items::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render the item list as an inline script assigning the JSON to a window
/// global, ready for the client-side panel renderer.
pub fn inline_items_script(items: &[Item], global: &str) -> Result<String> {
    let json = serde_json::to_string(items)?;
    Ok(format!("window.{} = {};", global, json))
}

/// Wrap compiled CSS in an inline style element. Empty CSS produces no tag;
/// downstream rendering tolerates the absence.
pub fn inline_style(css: &str, element_id: &str) -> Option<String> {
    if css.trim().is_empty() {
        return None;
    }
    Some(format!("<style id=\"{}\">\n{}</style>\n", element_id, css))
}

/// Metadata for the generated manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Version of the manifest format
    pub version: String,

    /// Timestamp when the manifest was generated
    pub generated_at: DateTime<Utc>,

    /// Extractor version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor_version: Option<String>,

    /// Resolved stylesheet path, if one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,

    /// Whether both artifacts came from the cache
    pub from_cache: bool,
}

/// Item-list and CSS statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestCounts {
    /// Total items in the list
    pub items_total: usize,

    /// Togglable class items
    pub class_items: usize,

    /// Heading items (section and breakpoint-group headings)
    pub heading_items: usize,

    /// Breakpoint groups discovered
    pub breakpoint_groups: usize,

    /// Compiled CSS size in bytes
    pub css_bytes: usize,

    /// Media-query blocks in the compiled CSS
    pub media_blocks: usize,
}

/// Complete manifest structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
    pub counts: ManifestCounts,
}

impl Manifest {
    /// Convert manifest to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Convert manifest to pretty JSON string
    pub fn to_pretty_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert manifest to compact JSON string
    pub fn to_compact_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builder pattern for creating manifests
pub struct ManifestBuilder {
    metadata: ManifestMetadata,
    counts: ManifestCounts,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            metadata: ManifestMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                extractor_version: Some(env!("CARGO_PKG_VERSION").to_string()),
                source_path: None,
                from_cache: false,
            },
            counts: ManifestCounts {
                items_total: 0,
                class_items: 0,
                heading_items: 0,
                breakpoint_groups: 0,
                css_bytes: 0,
                media_blocks: 0,
            },
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.source_path = Some(path.into());
        self
    }

    pub fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.metadata.from_cache = from_cache;
        self
    }

    /// Derive the item counts from the final item list.
    pub fn with_items(mut self, items: &[Item]) -> Self {
        self.counts.items_total = items.len();
        for item in items {
            match item {
                Item::Class { .. } => self.counts.class_items += 1,
                Item::Heading { bp, .. } => {
                    self.counts.heading_items += 1;
                    if *bp {
                        self.counts.breakpoint_groups += 1;
                    }
                }
            }
        }
        self
    }

    /// Build the final manifest with CSS statistics
    pub fn build(mut self, css: &str) -> Manifest {
        self.counts.css_bytes = css.len();
        self.counts.media_blocks = css.matches("@media").count();
        Manifest {
            metadata: self.metadata,
            counts: self.counts,
        }
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
