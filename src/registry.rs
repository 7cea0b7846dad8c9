//! Category-to-requirement registry
//!
//! Maps each rule category to the research project that gates it. Built
//! once per session from a fixed identifier table; identifiers missing
//! from the host ruleset resolve to "no gate" and are logged here, once.

use ahash::AHashMap;

use crate::core::error::{GateError, Result};
use crate::core::types::{CategoryKey, RequirementId};
use crate::host::ResearchProvider;

/// External research identifiers for the built-in categories
///
/// AnimalSleeping and AnimalAllowed share one research project.
static BUILTIN_REQUIREMENTS: [(CategoryKey, &str); 7] = [
    (CategoryKey::Stockpile, "ResearchAreas_Stockpiles"),
    (CategoryKey::Growing, "ResearchAreas_GrowingZones"),
    (CategoryKey::AnimalSleeping, "ResearchAreas_AnimalAreas"),
    (CategoryKey::AnimalAllowed, "ResearchAreas_AnimalAreas"),
    (CategoryKey::Home, "ResearchAreas_Home"),
    (CategoryKey::NoRoof, "ResearchAreas_NoRoof"),
    (CategoryKey::Allowed, "ResearchAreas_Allowed"),
];

#[derive(Debug, Clone)]
struct Requirement {
    identifier: String,
    id: Option<RequirementId>,
}

/// Static mapping from category to prerequisite research
///
/// Immutable after startup except for `register`, which adds
/// mod-supplied categories and never overwrites an existing one.
#[derive(Debug, Default)]
pub struct RequirementRegistry {
    map: AHashMap<CategoryKey, Requirement>,
}

impl RequirementRegistry {
    /// Build the registry from the built-in category table
    pub fn build(research: &dyn ResearchProvider) -> Self {
        let mut registry = Self::default();
        for (category, identifier) in &BUILTIN_REQUIREMENTS {
            registry.insert(category.clone(), identifier, research);
        }
        registry
    }

    fn insert(&mut self, category: CategoryKey, identifier: &str, research: &dyn ResearchProvider) {
        let id = research.lookup(identifier);
        if id.is_none() {
            tracing::warn!(
                "Research '{}' for category {} not found in ruleset; category will not be gated",
                identifier,
                category
            );
        }
        self.map.insert(
            category,
            Requirement {
                identifier: identifier.to_owned(),
                id,
            },
        );
    }

    /// Requirement gating a category; `None` means no gate
    pub fn resolve(&self, category: &CategoryKey) -> Option<RequirementId> {
        self.map.get(category).and_then(|r| r.id)
    }

    /// Identifier string the category was configured with
    pub fn identifier(&self, category: &CategoryKey) -> Option<&str> {
        self.map.get(category).map(|r| r.identifier.as_str())
    }

    pub fn is_known(&self, category: &CategoryKey) -> bool {
        self.map.contains_key(category)
    }

    /// Register a mod-supplied category gated by the given identifier
    pub fn register(
        &mut self,
        category: CategoryKey,
        identifier: &str,
        research: &dyn ResearchProvider,
    ) -> Result<()> {
        if self.map.contains_key(&category) {
            return Err(GateError::DuplicateCategory(category));
        }
        self.insert(category, identifier, research);
        Ok(())
    }

    /// All resolved requirement handles, deduplicated, in stable order
    pub fn requirements(&self) -> Vec<RequirementId> {
        let mut ids: Vec<_> = self.map.values().filter_map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TableResearch;

    fn full_research() -> TableResearch {
        let mut research = TableResearch::new();
        research.insert("ResearchAreas_Stockpiles", "Stockpile Zones", false);
        research.insert("ResearchAreas_GrowingZones", "Growing Zones", false);
        research.insert("ResearchAreas_AnimalAreas", "Animal Areas", false);
        research.insert("ResearchAreas_Home", "Home Areas", false);
        research.insert("ResearchAreas_NoRoof", "Roof Management", false);
        research.insert("ResearchAreas_Allowed", "Allowed Areas", false);
        research
    }

    #[test]
    fn test_build_resolves_builtin_categories() {
        let research = full_research();
        let registry = RequirementRegistry::build(&research);

        assert!(registry.resolve(&CategoryKey::Stockpile).is_some());
        assert_eq!(
            registry.identifier(&CategoryKey::Stockpile),
            Some("ResearchAreas_Stockpiles")
        );
        // Shared project for both animal categories
        assert_eq!(
            registry.resolve(&CategoryKey::AnimalSleeping),
            registry.resolve(&CategoryKey::AnimalAllowed)
        );
    }

    #[test]
    fn test_missing_identifier_means_no_gate() {
        let mut research = TableResearch::new();
        research.insert("ResearchAreas_Stockpiles", "Stockpile Zones", false);
        let registry = RequirementRegistry::build(&research);

        assert!(registry.resolve(&CategoryKey::Stockpile).is_some());
        assert_eq!(registry.resolve(&CategoryKey::NoRoof), None);
        // Still known, just ungated
        assert!(registry.is_known(&CategoryKey::NoRoof));
    }

    #[test]
    fn test_requirements_deduplicates_shared_projects() {
        let research = full_research();
        let registry = RequirementRegistry::build(&research);
        // 7 categories, 6 distinct projects (animal categories share one)
        assert_eq!(registry.requirements().len(), 6);
    }

    #[test]
    fn test_register_extension_category() {
        let mut research = full_research();
        research.insert("ResearchAreas_Shoveling", "Shoveling", true);
        let mut registry = RequirementRegistry::build(&research);

        let snow = CategoryKey::Custom("SnowClear".into());
        registry
            .register(snow.clone(), "ResearchAreas_Shoveling", &research)
            .unwrap();
        assert!(registry.resolve(&snow).is_some());
    }

    #[test]
    fn test_register_duplicate_is_error() {
        let research = full_research();
        let mut registry = RequirementRegistry::build(&research);

        let err = registry
            .register(CategoryKey::Home, "ResearchAreas_Home", &research)
            .unwrap_err();
        assert!(matches!(err, GateError::DuplicateCategory(CategoryKey::Home)));
        // Mapping unchanged
        assert_eq!(
            registry.identifier(&CategoryKey::Home),
            Some("ResearchAreas_Home")
        );
    }
}
