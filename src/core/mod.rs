//! Core plugin types

pub mod effects;
pub mod entity;
pub mod geometry;
pub mod item;
pub mod stone;
pub mod types;

pub use effects::{EffectKind, Particle, StatusEffect};
pub use entity::{EntityId, EntityStore, PlayerId};
pub use geometry::{BlockPos, Vec3};
pub use item::ItemStack;
pub use stone::StoneType;
pub use types::{translate_color_codes, AbilityName, ChatMessage, EntityName, Material, TextColor, SECTION_SIGN};
