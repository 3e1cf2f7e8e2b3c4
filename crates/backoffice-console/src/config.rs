//! Console configuration.
//!
//! Loaded from YAML. Every field is optional; a missing file is the same as
//! an empty one.
//!
//! ```yaml
//! page_size: 25
//! page_sizes: [10, 25, 50, 100]
//! export_dir: ./exports
//! screens:
//!   deposits:
//!     page_size: 50
//!     sort:
//!       keys:
//!         - { field: amount, kind: number, direction: desc }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use backoffice_view::{PageSize, SortConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConsoleError, Result};
use crate::screens::Screen;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "BACKOFFICE_CONFIG";

/// Per-screen overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenSettings {
    /// Page size when the screen opens.
    pub page_size: Option<PageSize>,
    /// Sort when the screen opens, replacing the preset's.
    pub sort: Option<SortConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Page size for screens without an override.
    pub page_size: PageSize,
    /// Page sizes an operator may pick.
    pub page_sizes: Vec<usize>,
    /// Where exports are written.
    pub export_dir: PathBuf,
    pub screens: BTreeMap<Screen, ScreenSettings>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            page_size: PageSize::DEFAULT,
            page_sizes: PageSize::STANDARD.to_vec(),
            export_dir: PathBuf::from("."),
            screens: BTreeMap::new(),
        }
    }
}

impl ConsoleConfig {
    /// Loads and validates the config at `path`; defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ConsoleConfig::default());
        }
        let text = fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_yaml::from_str(&text)
            .map_err(|e| ConsoleError::config(path, e.to_string()))?;
        config.validate(path)?;
        debug!(path = %path.display(), screens = config.screens.len(), "config loaded");
        Ok(config)
    }

    /// Parses and validates YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ConsoleConfig = serde_yaml::from_str(text)?;
        config.validate(Path::new("<inline>"))?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        if self.page_sizes.is_empty() {
            return Err(ConsoleError::config(origin, "page_sizes is empty"));
        }
        if self.page_sizes.contains(&0) {
            return Err(ConsoleError::config(origin, "page_sizes contains 0"));
        }
        self.check_allowed(self.page_size)
            .map_err(|reason| ConsoleError::config(origin, reason))?;
        for (screen, settings) in &self.screens {
            if let Some(size) = settings.page_size {
                self.check_allowed(size)
                    .map_err(|reason| ConsoleError::config(origin, format!("{screen}: {reason}")))?;
            }
        }
        Ok(())
    }

    fn check_allowed(&self, size: PageSize) -> std::result::Result<(), String> {
        if self.page_sizes.contains(&size.get()) {
            Ok(())
        } else {
            Err(format!(
                "page size {} is not one of {:?}",
                size, self.page_sizes
            ))
        }
    }

    /// Validates an operator-chosen page size.
    pub fn page_size(&self, size: usize) -> Result<PageSize> {
        let size = PageSize::new(size)?;
        self.check_allowed(size)
            .map_err(|reason| ConsoleError::argument("page-size", reason))?;
        Ok(size)
    }

    /// Opening page size for `screen`.
    pub fn page_size_for(&self, screen: Screen) -> PageSize {
        self.screens
            .get(&screen)
            .and_then(|s| s.page_size)
            .unwrap_or(self.page_size)
    }

    /// Opening sort override for `screen`, if any.
    pub fn sort_for(&self, screen: Screen) -> Option<&SortConfig> {
        self.screens.get(&screen).and_then(|s| s.sort.as_ref())
    }
}
