//! Inventory configuration loader.

use std::path::Path;

use armory_core::InventoryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for inventory configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<InventoryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InventoryConfig> {
        let config: InventoryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.split_ratio > 0.0 && config.split_ratio < 1.0) {
            anyhow::bail!(
                "split_ratio must lie strictly between 0 and 1, got {}",
                config.split_ratio
            );
        }
        if !(config.durability_per_use.is_finite() && config.durability_per_use >= 0.0) {
            anyhow::bail!(
                "durability_per_use must be a finite, non-negative number, got {}",
                config.durability_per_use
            );
        }
        Ok(config)
    }
}
