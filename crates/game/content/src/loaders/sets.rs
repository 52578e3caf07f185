//! Armor set loader.

use std::path::Path;

use armory_core::ArmorSet;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Armor set list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmorSetFile {
    pub sets: Vec<ArmorSet>,
}

/// Loader for armor sets from RON files.
pub struct ArmorSetLoader;

impl ArmorSetLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ArmorSet>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ArmorSet>> {
        let file: ArmorSetFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse armor set RON: {}", e))?;
        Ok(file.sets)
    }
}
