//! Gate configuration: enforcement flags, label overrides, sweep options
//!
//! The host persists this as plain key/value data; everything here is
//! serde round-trippable and loadable from TOML. Mutating the override
//! map or enforcement flags outside the engine must be followed by
//! `GateEngine::on_settings_changed` so cached classifications are not
//! kept past the change.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{GateError, Result};
use crate::core::types::{normalize_label, CategoryKey};

/// User-supplied mapping from normalized entity label to category
///
/// Highest priority signal during classification. Labels are stored
/// trimmed and lowercased; lookups expect already-normalized input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideMap {
    map: AHashMap<String, CategoryKey>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category mapped for a normalized label, if any
    pub fn lookup(&self, normalized_label: &str) -> Option<&CategoryKey> {
        self.map.get(normalized_label)
    }

    /// Add a mapping; rejects empty labels and duplicates
    pub fn add(&mut self, label: &str, category: CategoryKey) -> Result<()> {
        let key = normalize_label(label);
        if key.is_empty() {
            return Err(GateError::InvalidOverride {
                label: label.to_owned(),
                reason: "label is empty".to_owned(),
            });
        }
        if self.map.contains_key(&key) {
            return Err(GateError::InvalidOverride {
                label: label.to_owned(),
                reason: "label is already mapped".to_owned(),
            });
        }
        self.map.insert(key, category);
        Ok(())
    }

    /// Remove a mapping, returning whether it existed
    pub fn remove(&mut self, label: &str) -> bool {
        self.map.remove(&normalize_label(label)).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CategoryKey)> {
        self.map.iter()
    }
}

/// Operator-facing gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Per-category enforcement toggles; categories not listed are enforced
    pub enforcement: AHashMap<CategoryKey, bool>,

    /// Label overrides consulted before any other classification signal
    pub overrides: OverrideMap,

    /// Run the reconciliation sweep when a session loads
    pub remove_on_load: bool,

    /// Log at warn level when removing an area or zone that is in use
    pub warn_on_removal: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enforcement: AHashMap::new(),
            overrides: OverrideMap::new(),
            remove_on_load: true,
            warn_on_removal: true,
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether gating is enabled for a category (defaults to enabled)
    pub fn is_enforced(&self, category: &CategoryKey) -> bool {
        self.enforcement.get(category).copied().unwrap_or(true)
    }

    pub fn set_enforced(&mut self, category: CategoryKey, enforced: bool) {
        self.enforcement.insert(category, enforced);
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
