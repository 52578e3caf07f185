//! Item definition loader.

use std::path::Path;

use armory_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item definitions from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item definitions from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an [`ItemFile`]
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse item definitions from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let file: ItemFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item RON: {}", e))?;
        Ok(file.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::{ItemCategory, ItemHandle, SetId, StatKind};

    #[test]
    fn parses_basic_and_armor_items() {
        let items = ItemLoader::parse(
            r#"(
                items: [
                    (
                        handle: 1,
                        name: "Healing Potion",
                        category: Potion,
                        max_stack: 10,
                        unit_weight: 0.5,
                        cooldown: 3,
                    ),
                    (
                        handle: 10,
                        name: "Warden Helm",
                        category: Helmet,
                        max_stack: 1,
                        unit_weight: 3.0,
                        max_durability: 120.0,
                        modifiers: [(stat: MaxHealth, bonus: Flat(10))],
                        kind: Armor((
                            defense: 4,
                            set: Some(1),
                            traits: [(id: "vigilance")],
                        )),
                    ),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].handle, ItemHandle(1));
        assert_eq!(items[0].category, ItemCategory::Potion);
        assert_eq!(items[0].cooldown, 3);
        assert!(items[0].armor().is_none());

        let helm = &items[1];
        assert_eq!(helm.set(), Some(SetId(1)));
        assert_eq!(helm.modifiers[0].stat, StatKind::MaxHealth);
        let armor = helm.armor().unwrap();
        assert_eq!(armor.defense, 4);
        assert_eq!(armor.magic_defense, 0);
        assert_eq!(armor.traits[0].level, 1);
    }

    #[test]
    fn reports_parse_errors() {
        let error = ItemLoader::parse("(items: [(handle: \"one\")])").unwrap_err();
        assert!(error.to_string().contains("Failed to parse item RON"));
    }
}
