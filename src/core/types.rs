//! Strongly-typed wrappers for plugin concepts
//!
//! Display names, ability names and entity names are all strings, so they
//! get distinct newtypes that cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity name (player name or mob type name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityName(String);

impl EntityName {
    pub fn new(s: impl Into<String>) -> Self {
        EntityName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityName {
    fn from(s: &str) -> Self {
        EntityName(s.to_string())
    }
}

impl From<String> for EntityName {
    fn from(s: String) -> Self {
        EntityName(s)
    }
}

/// Name of an ability as shown to players (e.g. "Chain Lightning")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityName(String);

impl AbilityName {
    pub fn new(s: impl Into<String>) -> Self {
        AbilityName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AbilityName {
    fn from(s: &str) -> Self {
        AbilityName(s.to_string())
    }
}

/// Item material name in the host's namespace (e.g. "EMERALD")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material(String);

impl Material {
    pub fn new(s: impl Into<String>) -> Self {
        Material(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn emerald() -> Self {
        Material("EMERALD".to_string())
    }

    /// Normalise a configured material name: an optional `minecraft:`
    /// namespace is stripped and the rest uppercased. Names that cannot be a
    /// material id (empty, or anything besides letters, digits and `_`) give
    /// `None`. Whether the id exists is up to the host's registry.
    pub fn parse(name: &str) -> Option<Material> {
        let name = name.trim();
        let name = name.strip_prefix("minecraft:").unwrap_or(name);
        let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then(|| Material(name.to_ascii_uppercase()))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text colour of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColor {
    White,
    Red,
    Yellow,
    Green,
    Aqua,
    DarkPurple,
}

/// A chat message sent to a single player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub color: TextColor,
    pub text: String,
}

impl ChatMessage {
    pub fn new(color: TextColor, text: impl Into<String>) -> Self {
        ChatMessage {
            color,
            text: text.into(),
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Section sign the client reads as a formatting prefix
pub const SECTION_SIGN: char = '\u{a7}';

/// Turn `&`-prefixed colour and format codes (`&c`, `&l`, ...) into section
/// sign codes. An `&` not followed by a valid code is left alone.
pub fn translate_color_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&code) if c == '&' && is_format_code(code) => {
                out.push(SECTION_SIGN);
                out.push(code.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_format_code(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_name() {
        let name = EntityName::new("Alice");
        assert_eq!(name.as_str(), "Alice");
        assert_eq!(name.to_string(), "Alice");
    }

    #[test]
    fn test_material_parse() {
        assert_eq!(Material::parse(" blaze_rod "), Some(Material::new("BLAZE_ROD")));
        assert_eq!(Material::parse("minecraft:nether_star"), Some(Material::new("NETHER_STAR")));
        assert_eq!(Material::parse(""), None);
        assert_eq!(Material::parse("blaze rod"), None);
        assert_eq!(Material::parse("emerald!"), None);
    }

    #[test]
    fn test_translate_color_codes() {
        assert_eq!(translate_color_codes("&e&lLightning Stone"), "\u{a7}e\u{a7}lLightning Stone");
        assert_eq!(translate_color_codes("&A&Rok"), "\u{a7}a\u{a7}rok");
        assert_eq!(translate_color_codes("R&D && co&"), "R&D && co&");
        assert_eq!(translate_color_codes(""), "");
    }

    #[test]
    fn test_chat_message_display() {
        let msg = ChatMessage::new(TextColor::Red, "No enemies nearby!");
        assert_eq!(msg.to_string(), "No enemies nearby!");
        assert_eq!(msg.color, TextColor::Red);
    }
}
