//! Entity classification
//!
//! Resolves an area or zone to the rule category that gates it. Signals
//! are consulted in strict priority order: default-area exemption, user
//! override, structural zone kind, zone-backed label inheritance, label
//! heuristics, `Allowed` fallback. Structural signals take priority
//! over label text.
//!
//! Results are memoized per entity. The memo survives until overrides
//! change, the live zone set changes, or the entity is destroyed. The
//! zone-label index is scoped to one partition at a time; callers that
//! switch partitions mid-tick use `begin_partition`.

use ahash::AHashMap;

use crate::core::config::OverrideMap;
use crate::core::types::{normalize_label, CategoryKey, EntityId, Tick};
use crate::world::{EntityRef, Partition, ZoneKind};

/// Classification outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The partition's protected default/home area; never gated
    Exempt,
    Category(CategoryKey),
}

impl Classification {
    pub fn category(&self) -> Option<&CategoryKey> {
        match self {
            Classification::Exempt => None,
            Classification::Category(key) => Some(key),
        }
    }
}

/// Label predicate for the heuristic table; labels arrive normalized
#[derive(Debug)]
enum LabelPattern {
    Exact(&'static str),
    Contains(&'static str),
    ContainsAll(&'static [&'static str]),
    ContainsAny(&'static [&'static str]),
}

impl LabelPattern {
    fn matches(&self, label: &str) -> bool {
        match self {
            LabelPattern::Exact(text) => label == *text,
            LabelPattern::Contains(text) => label.contains(text),
            LabelPattern::ContainsAll(parts) => parts.iter().all(|p| label.contains(p)),
            LabelPattern::ContainsAny(parts) => parts.iter().any(|p| label.contains(p)),
        }
    }
}

/// Ordered label heuristics, first match wins
static LABEL_HEURISTICS: [(LabelPattern, CategoryKey); 6] = [
    (LabelPattern::Exact("home"), CategoryKey::Home),
    (LabelPattern::Contains("stockpile"), CategoryKey::Stockpile),
    (LabelPattern::Contains("growing"), CategoryKey::Growing),
    (
        LabelPattern::ContainsAll(&["animal", "sleeping"]),
        CategoryKey::AnimalSleeping,
    ),
    (
        LabelPattern::ContainsAll(&["animal", "allowed"]),
        CategoryKey::AnimalAllowed,
    ),
    (
        LabelPattern::ContainsAny(&["no roof", "noroof", "no-roof"]),
        CategoryKey::NoRoof,
    ),
];

fn zone_kind_category(kind: ZoneKind) -> Option<CategoryKey> {
    match kind {
        ZoneKind::Stockpile => Some(CategoryKey::Stockpile),
        ZoneKind::Growing => Some(CategoryKey::Growing),
        ZoneKind::Other => None,
    }
}

#[derive(Debug, Default)]
pub struct EntityClassifier {
    memo: AHashMap<EntityId, Classification>,
    /// normalized zone label -> structural category, for zone-backed areas
    zone_index: AHashMap<String, CategoryKey>,
    zone_index_tick: Option<Tick>,
}

impl EntityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify an entity against the current overrides and zone set
    pub fn classify(
        &mut self,
        entity: EntityRef<'_>,
        partition: &dyn Partition,
        overrides: &OverrideMap,
        tick: Tick,
    ) -> Classification {
        // The default area check is an identity compare; never memoized
        if partition.default_area() == Some(entity.id()) {
            return Classification::Exempt;
        }

        self.refresh_zone_index(partition, tick);

        if let Some(hit) = self.memo.get(&entity.id()) {
            return hit.clone();
        }
        let classification = self.resolve(entity, overrides);
        self.memo.insert(entity.id(), classification.clone());
        classification
    }

    fn resolve(&self, entity: EntityRef<'_>, overrides: &OverrideMap) -> Classification {
        let label = normalize_label(entity.label());

        if let Some(mapped) = overrides.lookup(&label) {
            return Classification::Category(mapped.clone());
        }

        if let Some(category) = entity.structural_kind().and_then(zone_kind_category) {
            return Classification::Category(category);
        }

        // Areas created alongside a zone share its label; inherit the
        // zone's structural classification
        if let Some(category) = self.zone_index.get(&label) {
            return Classification::Category(category.clone());
        }

        for (pattern, category) in &LABEL_HEURISTICS {
            if pattern.matches(&label) {
                return Classification::Category(category.clone());
            }
        }

        Classification::Category(CategoryKey::Allowed)
    }

    /// Rebuild the zone-label index, at most once per tick
    ///
    /// A structural change to the zone set invalidates the per-entity
    /// memo, since zone-backed areas may now classify differently.
    fn refresh_zone_index(&mut self, partition: &dyn Partition, tick: Tick) {
        if self.zone_index_tick == Some(tick) {
            return;
        }
        let mut fresh = AHashMap::new();
        for zone in partition.zones() {
            if let Some(category) = zone_kind_category(zone.kind) {
                fresh.insert(normalize_label(&zone.label), category);
            }
        }
        if fresh != self.zone_index {
            tracing::debug!("Zone set changed at tick {}; classification memo cleared", tick);
            self.memo.clear();
            self.zone_index = fresh;
        }
        self.zone_index_tick = Some(tick);
    }

    /// Force an index rebuild on the next query; required when switching
    /// partitions within a single tick
    pub fn begin_partition(&mut self) {
        self.zone_index_tick = None;
    }

    /// Drop memo and index; call when overrides or settings change
    pub fn invalidate(&mut self) {
        self.memo.clear();
        self.zone_index.clear();
        self.zone_index_tick = None;
    }

    /// Drop a destroyed entity's memo entry
    pub fn forget(&mut self, id: EntityId) {
        self.memo.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Area, MemoryPartition, Zone};

    fn classify_one(
        classifier: &mut EntityClassifier,
        entity: EntityRef<'_>,
        partition: &MemoryPartition,
        overrides: &OverrideMap,
    ) -> Classification {
        classifier.classify(entity, partition, overrides, 0)
    }

    #[test]
    fn test_default_area_is_exempt() {
        let mut partition = MemoryPartition::new("Colony");
        let home = partition.add_default_area("Home");
        let mut classifier = EntityClassifier::new();

        let area = partition.area(home).unwrap();
        let class = classify_one(
            &mut classifier,
            EntityRef::Area(area),
            &partition,
            &OverrideMap::new(),
        );
        assert_eq!(class, Classification::Exempt);
    }

    #[test]
    fn test_structural_kind_beats_label() {
        let partition = MemoryPartition::new("Colony");
        let mut classifier = EntityClassifier::new();

        // Label says growing, structure says stockpile
        let zone = Zone::new("growing pile", ZoneKind::Stockpile);
        let class = classify_one(
            &mut classifier,
            EntityRef::Zone(&zone),
            &partition,
            &OverrideMap::new(),
        );
        assert_eq!(class, Classification::Category(CategoryKey::Stockpile));
    }

    #[test]
    fn test_override_beats_structural_kind() {
        let partition = MemoryPartition::new("Colony");
        let mut classifier = EntityClassifier::new();
        let mut overrides = OverrideMap::new();
        overrides.add("dump", CategoryKey::Growing).unwrap();

        let zone = Zone::new("Dump", ZoneKind::Stockpile);
        let class = classify_one(&mut classifier, EntityRef::Zone(&zone), &partition, &overrides);
        assert_eq!(class, Classification::Category(CategoryKey::Growing));
    }

    #[test]
    fn test_zone_backed_area_inherits_kind() {
        let mut partition = MemoryPartition::new("Colony");
        partition.add_zone(Zone::new("East Field", ZoneKind::Growing));
        let area = Area::new("East Field");
        let mut classifier = EntityClassifier::new();

        let class = classify_one(
            &mut classifier,
            EntityRef::Area(&area),
            &partition,
            &OverrideMap::new(),
        );
        assert_eq!(class, Classification::Category(CategoryKey::Growing));
    }

    #[test]
    fn test_label_heuristics() {
        let partition = MemoryPartition::new("Colony");
        let mut classifier = EntityClassifier::new();
        let overrides = OverrideMap::new();

        let cases = [
            ("home", CategoryKey::Home),
            ("My Stockpile 2", CategoryKey::Stockpile),
            ("growing corn", CategoryKey::Growing),
            ("Animal sleeping spot", CategoryKey::AnimalSleeping),
            ("allowed animal run", CategoryKey::AnimalAllowed),
            ("no roof here", CategoryKey::NoRoof),
            ("NoRoof", CategoryKey::NoRoof),
            ("the no-roof yard", CategoryKey::NoRoof),
            ("Area 1", CategoryKey::Allowed),
        ];
        for (label, expected) in cases {
            let area = Area::new(label);
            let class =
                classify_one(&mut classifier, EntityRef::Area(&area), &partition, &overrides);
            assert_eq!(
                class,
                Classification::Category(expected.clone()),
                "label {:?}",
                label
            );
        }
    }

    #[test]
    fn test_home_heuristic_is_exact_match_only() {
        let partition = MemoryPartition::new("Colony");
        let mut classifier = EntityClassifier::new();

        let area = Area::new("homestead");
        let class = classify_one(
            &mut classifier,
            EntityRef::Area(&area),
            &partition,
            &OverrideMap::new(),
        );
        assert_eq!(class, Classification::Category(CategoryKey::Allowed));
    }

    #[test]
    fn test_memo_avoids_reresolution_but_forget_drops_it() {
        let mut partition = MemoryPartition::new("Colony");
        partition.add_zone(Zone::new("Pile", ZoneKind::Stockpile));
        let area = Area::new("Pile");
        let mut classifier = EntityClassifier::new();
        let overrides = OverrideMap::new();

        let first = classifier.classify(EntityRef::Area(&area), &partition, &overrides, 1);
        assert_eq!(first, Classification::Category(CategoryKey::Stockpile));
        assert!(classifier.memo.contains_key(&area.id));

        classifier.forget(area.id);
        assert!(!classifier.memo.contains_key(&area.id));
    }

    #[test]
    fn test_zone_set_change_invalidates_memo() {
        let mut partition = MemoryPartition::new("Colony");
        let area = Area::new("East Field");
        let mut classifier = EntityClassifier::new();
        let overrides = OverrideMap::new();

        // No zone yet: plain custom area
        let class = classifier.classify(EntityRef::Area(&area), &partition, &overrides, 1);
        assert_eq!(class, Classification::Category(CategoryKey::Allowed));

        // Zone appears under the same label on a later tick
        partition.add_zone(Zone::new("East Field", ZoneKind::Growing));
        let class = classifier.classify(EntityRef::Area(&area), &partition, &overrides, 2);
        assert_eq!(class, Classification::Category(CategoryKey::Growing));
    }

    #[test]
    fn test_invalidate_picks_up_new_overrides() {
        let partition = MemoryPartition::new("Colony");
        let area = Area::new("FarmZone");
        let mut classifier = EntityClassifier::new();
        let mut overrides = OverrideMap::new();

        let class = classifier.classify(EntityRef::Area(&area), &partition, &overrides, 0);
        assert_eq!(class, Classification::Category(CategoryKey::Allowed));

        overrides.add("farmzone", CategoryKey::Growing).unwrap();
        classifier.invalidate();
        let class = classifier.classify(EntityRef::Area(&area), &partition, &overrides, 0);
        assert_eq!(class, Classification::Category(CategoryKey::Growing));
    }
}
