//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for areas and zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Opaque handle to a host-tracked research project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequirementId(pub u32);

/// Rule bucket an area or zone is classified into
///
/// The built-in set is fixed at startup; mods may register additional
/// buckets as `Custom` keys, which are never removed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategoryKey {
    Stockpile,
    Growing,
    AnimalSleeping,
    AnimalAllowed,
    Home,
    NoRoof,
    /// Custom player-made area with no specific category
    Allowed,
    /// Mod-registered extension bucket
    Custom(String),
}

impl CategoryKey {
    pub fn as_str(&self) -> &str {
        match self {
            CategoryKey::Stockpile => "Stockpile",
            CategoryKey::Growing => "Growing",
            CategoryKey::AnimalSleeping => "AnimalSleeping",
            CategoryKey::AnimalAllowed => "AnimalAllowed",
            CategoryKey::Home => "Home",
            CategoryKey::NoRoof => "NoRoof",
            CategoryKey::Allowed => "Allowed",
            CategoryKey::Custom(name) => name,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CategoryKey> for String {
    fn from(key: CategoryKey) -> Self {
        key.as_str().to_owned()
    }
}

impl From<String> for CategoryKey {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Stockpile" => CategoryKey::Stockpile,
            "Growing" => CategoryKey::Growing,
            "AnimalSleeping" => CategoryKey::AnimalSleeping,
            "AnimalAllowed" => CategoryKey::AnimalAllowed,
            "Home" => CategoryKey::Home,
            "NoRoof" => CategoryKey::NoRoof,
            "Allowed" => CategoryKey::Allowed,
            _ => CategoryKey::Custom(name),
        }
    }
}

impl From<&str> for CategoryKey {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

/// Canonical label form used for override lookups and label heuristics
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key_string_round_trip() {
        let keys = [
            CategoryKey::Stockpile,
            CategoryKey::Growing,
            CategoryKey::AnimalSleeping,
            CategoryKey::AnimalAllowed,
            CategoryKey::Home,
            CategoryKey::NoRoof,
            CategoryKey::Allowed,
            CategoryKey::Custom("SnowClear".into()),
        ];
        for key in keys {
            let round = CategoryKey::from(String::from(key.clone()));
            assert_eq!(round, key);
        }
    }

    #[test]
    fn test_unknown_name_becomes_custom() {
        assert_eq!(
            CategoryKey::from("Pollution"),
            CategoryKey::Custom("Pollution".into())
        );
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  MyStockpile "), "mystockpile");
        assert_eq!(normalize_label("Animal Sleeping 1"), "animal sleeping 1");
        assert_eq!(normalize_label(""), "");
    }
}
