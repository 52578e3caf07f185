//! In-memory oracle over validated items and armor sets.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    ArmorSet, ArmorSetOracle, ItemDefinition, ItemHandle, ItemOracle, OracleError, SetId,
    ValidationError, validate,
};

/// Validated content shared by the inventory and the bonus engine.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: BTreeMap<ItemHandle, Arc<ItemDefinition>>,
    sets: BTreeMap<SetId, Arc<ArmorSet>>,
}

impl ItemCatalog {
    /// Validates and indexes content.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`] found; the catalog is only built from
    /// content that passes all checks.
    pub fn build(
        items: Vec<ItemDefinition>,
        sets: Vec<ArmorSet>,
    ) -> Result<Self, Vec<ValidationError>> {
        let errors = validate(&items, &sets);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            items: items
                .into_iter()
                .map(|item| (item.handle, Arc::new(item)))
                .collect(),
            sets: sets
                .into_iter()
                .map(|set| (set.id, Arc::new(set)))
                .collect(),
        })
    }

    /// Looks up an item definition.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemNotFound` for unknown handles.
    pub fn item(&self, handle: ItemHandle) -> Result<Arc<ItemDefinition>, OracleError> {
        self.items
            .get(&handle)
            .cloned()
            .ok_or(OracleError::ItemNotFound(handle))
    }

    /// Looks up an armor set.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SetNotFound` for unknown ids.
    pub fn armor_set(&self, id: SetId) -> Result<Arc<ArmorSet>, OracleError> {
        self.sets
            .get(&id)
            .cloned()
            .ok_or(OracleError::SetNotFound(id))
    }

    /// Finds an item by display name, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<ItemDefinition>> {
        self.items
            .values()
            .find(|item| item.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }
}

impl ItemOracle for ItemCatalog {
    fn definition(&self, handle: ItemHandle) -> Option<Arc<ItemDefinition>> {
        self.items.get(&handle).cloned()
    }

    fn all_definitions(&self) -> Vec<Arc<ItemDefinition>> {
        self.items.values().cloned().collect()
    }
}

impl ArmorSetOracle for ItemCatalog {
    fn set(&self, id: SetId) -> Option<Arc<ArmorSet>> {
        self.sets.get(&id).cloned()
    }

    fn all_sets(&self) -> Vec<Arc<ArmorSet>> {
        self.sets.values().cloned().collect()
    }
}
