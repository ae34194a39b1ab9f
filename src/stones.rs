//! Stone items: creation and identification

use crate::core::{translate_color_codes, ItemStack, StoneType};
use crate::loader::ConfigHandle;

/// Persistent data key holding a stone's uppercase type tag
pub const STONE_TYPE_KEY: &str = "stone_type";

#[derive(Debug, Clone)]
pub struct StoneManager {
    config: ConfigHandle,
}

impl StoneManager {
    pub fn new(config: ConfigHandle) -> Self {
        StoneManager { config }
    }

    /// Build a stone item from the current configuration, with `&` colour
    /// codes in the name and lore translated
    pub fn create_stone(&self, stone: StoneType) -> ItemStack {
        let mut item = self.config.read(|config| {
            let mut item = ItemStack::new(config.material(stone));
            item.display_name = Some(translate_color_codes(&config.display_name(stone)));
            item.lore = config.lore(stone).iter().map(|line| translate_color_codes(line)).collect();
            item
        });
        item.set_persistent(STONE_TYPE_KEY, stone.tag());
        item
    }

    /// The stone type an item is tagged with, if any. Tags must match the
    /// uppercase name exactly.
    pub fn stone_type_of(&self, item: &ItemStack) -> Option<StoneType> {
        StoneType::from_tag(item.persistent(STONE_TYPE_KEY)?)
    }

    pub fn is_ability_stone(&self, item: &ItemStack) -> bool {
        self.stone_type_of(item).is_some()
    }
}
