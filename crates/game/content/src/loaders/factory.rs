//! Content factory for building the item catalog from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use armory_core::{ArmorSet, InventoryConfig, ItemCatalog, ItemDefinition};

use crate::loaders::{ArmorSetLoader, ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads all inventory content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// └── sets.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load inventory configuration from `config.toml`. A missing file yields
    /// the default layout.
    pub fn load_config(&self) -> LoadResult<InventoryConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(InventoryConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item definitions from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load armor sets from `sets.ron`. A missing file means no sets.
    pub fn load_sets(&self) -> LoadResult<Vec<ArmorSet>> {
        let path = self.data_dir.join("sets.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ArmorSetLoader::load(&path)
    }

    /// Load and validate items and sets into a catalog.
    ///
    /// Every validation problem is reported, one per line.
    pub fn load_catalog(&self) -> LoadResult<ItemCatalog> {
        let items = self.load_items().context("loading items")?;
        let sets = self.load_sets().context("loading armor sets")?;

        let catalog = ItemCatalog::build(items, sets).map_err(|errors| {
            for error in &errors {
                tracing::warn!(%error, "invalid content");
            }
            let report: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow::anyhow!(
                "{} content error(s) in {}:\n{}",
                errors.len(),
                self.data_dir.display(),
                report.join("\n")
            )
        })?;

        tracing::info!(
            items = catalog.item_count(),
            sets = catalog.set_count(),
            "loaded content"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::{ItemHandle, SetId};

    const ITEMS: &str = r#"(
        items: [
            (handle: 1, name: "Bread", category: Food, max_stack: 20, unit_weight: 0.2),
            (
                handle: 10,
                name: "Warden Helm",
                category: Helmet,
                max_stack: 1,
                unit_weight: 3.0,
                kind: Armor((defense: 4, set: Some(1))),
            ),
            (
                handle: 11,
                name: "Warden Boots",
                category: Boots,
                max_stack: 1,
                unit_weight: 2.0,
                kind: Armor((defense: 2, set: Some(1))),
            ),
        ],
    )"#;

    const SETS: &str = r#"(
        sets: [(
            id: 1,
            name: "Warden",
            members: [10, 11],
            effects: [(name: "pair", pieces_required: 2)],
        )],
    )"#;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_complete_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "items.ron", ITEMS);
        write(dir.path(), "sets.ron", SETS);
        write(dir.path(), "config.toml", "hotbar_slots = 4\ngeneral_slots = 8\n");

        let factory = ContentFactory::new(dir.path());
        let catalog = factory.load_catalog().unwrap();
        let config = factory.load_config().unwrap();

        assert_eq!(catalog.item_count(), 3);
        assert_eq!(catalog.armor_set(SetId(1)).unwrap().members.len(), 2);
        assert_eq!(catalog.item(ItemHandle(1)).unwrap().name, "Bread");
        assert_eq!(config.storage_slots(), 12);
    }

    #[test]
    fn optional_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "items.ron", ITEMS.replace("Some(1)", "None").as_str());

        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), InventoryConfig::default());
        assert_eq!(factory.load_catalog().unwrap().set_count(), 0);
    }

    #[test]
    fn validation_errors_are_all_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "items.ron", ITEMS);
        write(
            dir.path(),
            "sets.ron",
            &SETS.replace("[10, 11]", "[10, 12]").replace("2)", "3)"),
        );

        let error = ContentFactory::new(dir.path())
            .load_catalog()
            .unwrap_err()
            .to_string();

        assert!(error.contains("member item#12 is not defined"), "{error}");
        assert!(error.contains("tier"), "{error}");
    }

    #[test]
    fn missing_items_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(format!("{error:#}").contains("Failed to read file"));
    }
}
