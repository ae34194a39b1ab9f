//! Stone type → handler registry

use super::{
    AbilityHandler, ChainLightning, DashForward, FireBurst, HealWave, ShadowCurse, StoneShield,
};
use crate::core::StoneType;
use crate::loader::ConfigHandle;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct AbilityCatalog {
    handlers: FxHashMap<StoneType, Box<dyn AbilityHandler>>,
}

impl AbilityCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog with all six stone abilities reading `config`
    pub fn with_default_abilities(config: &ConfigHandle) -> Self {
        let mut catalog = AbilityCatalog::new();
        catalog.register(Box::new(FireBurst::new(config.clone())));
        catalog.register(Box::new(HealWave::new(config.clone())));
        catalog.register(Box::new(StoneShield::new(config.clone())));
        catalog.register(Box::new(DashForward::new(config.clone())));
        catalog.register(Box::new(ChainLightning::new(config.clone())));
        catalog.register(Box::new(ShadowCurse::new(config.clone())));
        catalog
    }

    /// Register a handler under its own stone type, returning the one it replaced
    pub fn register(&mut self, handler: Box<dyn AbilityHandler>) -> Option<Box<dyn AbilityHandler>> {
        self.handlers.insert(handler.stone_type(), handler)
    }

    pub fn unregister(&mut self, stone: StoneType) -> Option<Box<dyn AbilityHandler>> {
        self.handlers.remove(&stone)
    }

    pub fn handler_for(&self, stone: StoneType) -> Option<&dyn AbilityHandler> {
        self.handlers.get(&stone).map(|handler| handler.as_ref())
    }

    pub fn contains(&self, stone: StoneType) -> bool {
        self.handlers.contains_key(&stone)
    }

    /// Registered stone types in catalog order
    pub fn stone_types(&self) -> Vec<StoneType> {
        StoneType::ALL
            .into_iter()
            .filter(|stone| self.contains(*stone))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for AbilityCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityCatalog")
            .field("stones", &self.stone_types())
            .finish()
    }
}
