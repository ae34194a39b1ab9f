//! Stone configuration (TOML)
//!
//! ```toml
//! [stones.lightning]
//! name = "&e&lLightning Stone"
//! ability_name = "Chain Lightning"
//! material = "EMERALD"
//! cooldown = 12
//! lore = ["&7Ability: &eChain Lightning"]
//! ```
//!
//! Every key is optional and falls back to the stone's built-in default.

use crate::core::{AbilityName, Material, StoneType};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Settings for a single stone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoneSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Cooldown in whole seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoneTable {
    #[serde(default)]
    pub fire: StoneSettings,
    #[serde(default)]
    pub water: StoneSettings,
    #[serde(default)]
    pub earth: StoneSettings,
    #[serde(default)]
    pub air: StoneSettings,
    #[serde(default)]
    pub lightning: StoneSettings,
    #[serde(default)]
    pub darkness: StoneSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StonesConfig {
    #[serde(default)]
    pub stones: StoneTable,
}

impl StonesConfig {
    /// Configuration with every default written out explicitly
    pub fn with_defaults() -> Self {
        let mut config = StonesConfig::default();
        for stone in StoneType::ALL {
            *config.settings_mut(stone) = StoneSettings {
                name: Some(stone.default_display_name().to_string()),
                ability_name: Some(stone.default_ability_name().to_string()),
                material: Some(Material::emerald().as_str().to_string()),
                cooldown: Some(stone.default_cooldown_secs()),
                lore: stone.default_lore().iter().map(|l| l.to_string()).collect(),
            };
        }
        config
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn settings(&self, stone: StoneType) -> &StoneSettings {
        match stone {
            StoneType::Fire => &self.stones.fire,
            StoneType::Water => &self.stones.water,
            StoneType::Earth => &self.stones.earth,
            StoneType::Air => &self.stones.air,
            StoneType::Lightning => &self.stones.lightning,
            StoneType::Darkness => &self.stones.darkness,
        }
    }

    pub fn settings_mut(&mut self, stone: StoneType) -> &mut StoneSettings {
        match stone {
            StoneType::Fire => &mut self.stones.fire,
            StoneType::Water => &mut self.stones.water,
            StoneType::Earth => &mut self.stones.earth,
            StoneType::Air => &mut self.stones.air,
            StoneType::Lightning => &mut self.stones.lightning,
            StoneType::Darkness => &mut self.stones.darkness,
        }
    }

    /// Configured cooldown; negative values mean no cooldown
    pub fn cooldown(&self, stone: StoneType) -> Duration {
        let secs = self
            .settings(stone)
            .cooldown
            .unwrap_or_else(|| stone.default_cooldown_secs());
        Duration::from_secs(secs.max(0) as u64)
    }

    pub fn ability_name(&self, stone: StoneType) -> AbilityName {
        match &self.settings(stone).ability_name {
            Some(name) => AbilityName::new(name.clone()),
            None => AbilityName::new(stone.default_ability_name()),
        }
    }

    pub fn display_name(&self, stone: StoneType) -> String {
        self.settings(stone)
            .name
            .clone()
            .unwrap_or_else(|| stone.default_display_name().to_string())
    }

    /// Configured material; missing or malformed names fall back to EMERALD
    pub fn material(&self, stone: StoneType) -> Material {
        let Some(name) = self.settings(stone).material.as_deref() else {
            return Material::emerald();
        };
        Material::parse(name).unwrap_or_else(|| {
            tracing::warn!(%stone, material = name, "invalid material, using EMERALD");
            Material::emerald()
        })
    }

    /// Configured lore; an empty list means the default lore
    pub fn lore(&self, stone: StoneType) -> Vec<String> {
        let lore = &self.settings(stone).lore;
        if lore.is_empty() {
            stone.default_lore().iter().map(|l| l.to_string()).collect()
        } else {
            lore.clone()
        }
    }
}

/// Shared, reloadable view of the configuration
///
/// Cloning the handle shares the same configuration. Readers always see the
/// most recent [`ConfigHandle::replace`].
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<StonesConfig>>,
}

impl ConfigHandle {
    pub fn new(config: StonesConfig) -> Self {
        ConfigHandle {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Run `f` against the current configuration
    pub fn read<R>(&self, f: impl FnOnce(&StonesConfig) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn snapshot(&self) -> StonesConfig {
        self.read(StonesConfig::clone)
    }

    pub fn replace(&self, config: StonesConfig) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = config;
    }

    pub fn update(&self, f: impl FnOnce(&mut StonesConfig)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    pub fn cooldown(&self, stone: StoneType) -> Duration {
        self.read(|config| config.cooldown(stone))
    }
}
