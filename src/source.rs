//! Stylesheet source resolution.
//!
//! The helpers stylesheet is looked up through a fixed priority chain:
//! module directory first, then the legacy plugin location, then three
//! theme-relative locations kept for backwards compatibility. An explicit
//! override replaces the chain entirely. "Not found" is an absence signal,
//! never an error; callers substitute empty artifacts.

use crate::config::SourceConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Default stylesheet file name.
pub const DEFAULT_FILE_NAME: &str = "helpers.scss";

/// Theme-relative directories tried in order when the module and legacy
/// locations are missing.
const THEME_SUBDIRS: [&str; 3] = ["src/scss/utilities", "assets/scss/utilities", "scss/utilities"];

/// A located and loaded stylesheet. `(path, modified)` is the cache
/// identity for derived artifacts.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub lines: Vec<String>,
}

/// Resolves the helpers stylesheet path and reads it into lines.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    module_dir: PathBuf,
    legacy_dir: Option<PathBuf>,
    theme_dir: Option<PathBuf>,
    file_name: String,
    override_path: Option<PathBuf>,
}

impl SourceLocator {
    pub fn new(module_dir: impl Into<PathBuf>) -> Self {
        Self {
            module_dir: module_dir.into(),
            legacy_dir: None,
            theme_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            override_path: None,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            module_dir: config.module_dir.clone(),
            legacy_dir: config.legacy_dir.clone(),
            theme_dir: config.theme_dir.clone(),
            file_name: config.file_name.clone(),
            override_path: config.override_path.clone(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_legacy_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.legacy_dir = Some(dir.into());
        self
    }

    pub fn with_theme_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_dir = Some(dir.into());
        self
    }

    /// Replace the candidate chain with one explicit path.
    pub fn with_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    /// Pre-compiled stylesheet shipped next to the module sources. When it
    /// exists it is served as-is instead of compiling the SCSS; an explicit
    /// override always compiles.
    pub fn precompiled_candidate(&self) -> Option<PathBuf> {
        if self.override_path.is_some() {
            return None;
        }
        let css_name = Path::new(&self.file_name).with_extension("css");
        let path = self.module_dir.join("assets/css").join(css_name);
        path.is_file().then_some(path)
    }

    /// Candidate paths in priority order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.override_path {
            return vec![path.clone()];
        }
        let mut candidates = vec![self.module_dir.join("assets/scss").join(&self.file_name)];
        if let Some(legacy) = &self.legacy_dir {
            candidates.push(legacy.join("assets/scss").join(&self.file_name));
        }
        if let Some(theme) = &self.theme_dir {
            for subdir in THEME_SUBDIRS {
                candidates.push(theme.join(subdir).join(&self.file_name));
            }
        }
        candidates
    }

    /// First readable candidate, if any.
    pub fn locate(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|path| path.is_file())
    }

    /// Locate and load the stylesheet. Any read failure is treated the same
    /// as absence.
    pub fn read(&self) -> Option<SourceFile> {
        let path = self.locate()?;
        Self::read_path(&path)
    }

    fn read_path(path: &Path) -> Option<SourceFile> {
        let content = fs::read_to_string(path).ok()?;
        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Some(SourceFile {
            path: path.to_path_buf(),
            modified,
            lines: content.lines().map(str::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_location_wins() {
        let root = tempdir().unwrap();
        let module = root.path().join("module");
        let theme = root.path().join("theme");
        fs::create_dir_all(module.join("assets/scss")).unwrap();
        fs::create_dir_all(theme.join("scss/utilities")).unwrap();
        fs::write(module.join("assets/scss/helpers.scss"), ".a {}").unwrap();
        fs::write(theme.join("scss/utilities/helpers.scss"), ".b {}").unwrap();

        let locator = SourceLocator::new(&module).with_theme_dir(&theme);
        assert_eq!(
            locator.locate().unwrap(),
            module.join("assets/scss/helpers.scss")
        );
    }

    #[test]
    fn test_theme_fallback_order() {
        let root = tempdir().unwrap();
        let theme = root.path().join("theme");
        fs::create_dir_all(theme.join("assets/scss/utilities")).unwrap();
        fs::create_dir_all(theme.join("scss/utilities")).unwrap();
        fs::write(theme.join("assets/scss/utilities/helpers.scss"), ".a {}").unwrap();
        fs::write(theme.join("scss/utilities/helpers.scss"), ".b {}").unwrap();

        let locator = SourceLocator::new(root.path().join("missing")).with_theme_dir(&theme);
        assert_eq!(
            locator.locate().unwrap(),
            theme.join("assets/scss/utilities/helpers.scss")
        );
    }

    #[test]
    fn test_override_replaces_chain() {
        let root = tempdir().unwrap();
        let module = root.path().join("module");
        fs::create_dir_all(module.join("assets/scss")).unwrap();
        fs::write(module.join("assets/scss/helpers.scss"), ".a {}").unwrap();
        let override_path = root.path().join("custom.scss");
        fs::write(&override_path, ".b {}").unwrap();

        let locator = SourceLocator::new(&module).with_override(&override_path);
        assert_eq!(locator.locate().unwrap(), override_path);
        assert_eq!(locator.candidates(), vec![override_path]);
    }

    #[test]
    fn test_precompiled_candidate_requires_the_file() {
        let root = tempdir().unwrap();
        let module = root.path().join("module");
        fs::create_dir_all(module.join("assets/css")).unwrap();

        let locator = SourceLocator::new(&module);
        assert_eq!(locator.precompiled_candidate(), None);

        fs::write(module.join("assets/css/helpers.css"), ".a {}").unwrap();
        assert_eq!(
            locator.precompiled_candidate(),
            Some(module.join("assets/css/helpers.css"))
        );
    }

    #[test]
    fn test_override_skips_the_precompiled_fast_path() {
        let root = tempdir().unwrap();
        let module = root.path().join("module");
        fs::create_dir_all(module.join("assets/css")).unwrap();
        fs::write(module.join("assets/css/helpers.css"), ".a {}").unwrap();

        let locator = SourceLocator::new(&module).with_override(root.path().join("x.scss"));
        assert_eq!(locator.precompiled_candidate(), None);
    }

    #[test]
    fn test_missing_source_is_absence_not_error() {
        let root = tempdir().unwrap();
        let locator = SourceLocator::new(root.path().join("nowhere"));
        assert!(locator.locate().is_none());
        assert!(locator.read().is_none());
    }

    #[test]
    fn test_read_splits_lines_and_records_mtime() {
        let root = tempdir().unwrap();
        let module = root.path().join("module");
        fs::create_dir_all(module.join("assets/scss")).unwrap();
        fs::write(module.join("assets/scss/helpers.scss"), ".a { color: red; }\n.b {}\n").unwrap();

        let source = SourceLocator::new(&module).read().unwrap();
        assert_eq!(source.lines.len(), 2);
        assert_eq!(source.lines[0], ".a { color: red; }");
        assert!(source.modified > SystemTime::UNIX_EPOCH);
    }
}
