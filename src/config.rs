//! @ai:module:intent Configuration for metric log comparison
//! @ai:module:layer infrastructure
//! @ai:module:public_api CompareConfig
//! @ai:module:stateless true

use crate::comparator::CompareOptions;
use crate::output::OutputFormat;
use crate::record::{DEFAULT_AGGREGATE_CATEGORY, DEFAULT_MARKER_PREFIX};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Comparison settings, loadable from TOML and overridden by CLI flags
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareConfig {
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,
    #[serde(default = "default_aggregate_category")]
    pub aggregate_category: String,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            marker_prefix: default_marker_prefix(),
            aggregate_category: default_aggregate_category(),
            strict: false,
            format: OutputFormat::default(),
        }
    }
}

fn default_marker_prefix() -> String {
    DEFAULT_MARKER_PREFIX.to_string()
}

fn default_aggregate_category() -> String {
    DEFAULT_AGGREGATE_CATEGORY.to_string()
}

impl CompareConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// @ai:intent Options handed to the comparator
    /// @ai:effects pure
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            marker_prefix: self.marker_prefix.clone(),
            aggregate_category: self.aggregate_category.clone(),
            strict: self.strict,
        }
    }
}
