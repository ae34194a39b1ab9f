//! Item stacks as seen by the plugin

use crate::core::Material;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A held item
///
/// Only the parts the plugin reads or writes: material, display text and a
/// string-keyed persistent data container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub display_name: Option<String>,
    pub lore: Vec<String>,
    persistent_data: FxHashMap<String, String>,
}

impl ItemStack {
    pub fn new(material: Material) -> Self {
        ItemStack {
            material,
            display_name: None,
            lore: Vec::new(),
            persistent_data: FxHashMap::default(),
        }
    }

    pub fn persistent(&self, key: &str) -> Option<&str> {
        self.persistent_data.get(key).map(String::as_str)
    }

    pub fn set_persistent(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.persistent_data.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_data() {
        let mut item = ItemStack::new(Material::emerald());
        assert_eq!(item.persistent("stone_type"), None);

        item.set_persistent("stone_type", "FIRE");
        assert_eq!(item.persistent("stone_type"), Some("FIRE"));
    }
}
