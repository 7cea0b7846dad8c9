//! Session gate engine
//!
//! One `GateEngine` exists per loaded session. It owns the
//! configuration, the requirement registry, both caches, and the
//! research provider handle, and exposes the entry points the host
//! wires its lifecycle events into: creation attempts, session load,
//! the periodic tick, and settings changes.

use crate::classify::EntityClassifier;
use crate::completion::{CompletionCache, REFRESH_INTERVAL_TICKS};
use crate::core::config::GateConfig;
use crate::core::error::Result;
use crate::core::types::{CategoryKey, Tick};
use crate::decision::{evaluate, Verdict};
use crate::host::{Messenger, ResearchProvider, Severity};
use crate::registry::RequirementRegistry;
use crate::sweep::{self, SweepReport};
use crate::world::{EntityRef, Partition};

pub struct GateEngine<R: ResearchProvider> {
    research: R,
    config: GateConfig,
    registry: RequirementRegistry,
    completion: CompletionCache,
    classifier: EntityClassifier,
    current_tick: Tick,
}

impl<R: ResearchProvider> GateEngine<R> {
    pub fn new(config: GateConfig, research: R) -> Self {
        let registry = RequirementRegistry::build(&research);
        Self {
            research,
            config,
            registry,
            completion: CompletionCache::new(),
            classifier: EntityClassifier::new(),
            current_tick: 0,
        }
    }

    /// Gate check for an entity about to be created
    ///
    /// An absent entity always passes; hosts probe with nothing selected.
    pub fn may_create(
        &mut self,
        entity: Option<EntityRef<'_>>,
        partition: &dyn Partition,
    ) -> Verdict {
        let Some(entity) = entity else {
            return Verdict::Allow;
        };
        let classification =
            self.classifier
                .classify(entity, partition, &self.config.overrides, self.current_tick);
        evaluate(
            &classification,
            &self.config,
            &self.registry,
            &mut self.completion,
            &self.research,
        )
    }

    /// Creation interception entry point; notifies the player on deny
    pub fn on_entity_create_attempt(
        &mut self,
        entity: Option<EntityRef<'_>>,
        partition: &dyn Partition,
        messenger: &mut dyn Messenger,
    ) -> Verdict {
        let verdict = self.may_create(entity, partition);
        if let Verdict::Deny { reason } = &verdict {
            messenger.notify(reason, Severity::RejectInput);
        }
        verdict
    }

    /// Session load: refresh completion state, then reconcile the world
    ///
    /// The refresh runs before any gate query so load-time decisions
    /// never see pre-session cache state.
    pub fn on_session_load(
        &mut self,
        partitions: &mut [&mut dyn Partition],
        messenger: &mut dyn Messenger,
    ) -> SweepReport {
        self.completion
            .refresh(&self.registry, &self.research, self.current_tick);
        if !self.config.remove_on_load {
            return SweepReport::default();
        }
        let report = self.sweep(partitions);
        for line in report.summaries() {
            tracing::info!("{}", line);
            messenger.notify(&line, Severity::Neutral);
        }
        report
    }

    /// Reconcile all partitions against the current ruleset
    pub fn sweep(&mut self, partitions: &mut [&mut dyn Partition]) -> SweepReport {
        sweep::sweep(
            partitions,
            &self.config,
            &self.registry,
            &mut self.completion,
            &mut self.classifier,
            &self.research,
            self.current_tick,
        )
    }

    /// Periodic host tick; refreshes the completion cache on a fixed interval
    pub fn on_periodic_tick(&mut self, tick: Tick) {
        self.current_tick = tick;
        if tick % REFRESH_INTERVAL_TICKS == 0 {
            self.completion
                .refresh(&self.registry, &self.research, tick);
        }
    }

    /// Settings changed outside the engine: drop every cached result
    pub fn on_settings_changed(&mut self) {
        self.classifier.invalidate();
        self.completion.invalidate();
    }

    /// Add a label override and invalidate cached classifications
    pub fn add_override(&mut self, label: &str, category: CategoryKey) -> Result<()> {
        self.config.overrides.add(label, category)?;
        self.classifier.invalidate();
        Ok(())
    }

    /// Remove a label override, invalidating only if it existed
    pub fn remove_override(&mut self, label: &str) -> bool {
        let removed = self.config.overrides.remove(label);
        if removed {
            self.classifier.invalidate();
        }
        removed
    }

    /// Toggle enforcement for one category
    ///
    /// Cached classifications and completion state stay valid; the flag
    /// is consulted on every verdict.
    pub fn set_enforced(&mut self, category: CategoryKey, enforced: bool) {
        self.config.set_enforced(category, enforced);
    }

    /// Register a mod category gated by the given research identifier
    pub fn register_category(&mut self, category: CategoryKey, identifier: &str) -> Result<()> {
        self.registry.register(category, identifier, &self.research)
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Mutable settings access; follow external edits with
    /// `on_settings_changed`
    pub fn config_mut(&mut self) -> &mut GateConfig {
        &mut self.config
    }

    pub fn registry(&self) -> &RequirementRegistry {
        &self.registry
    }

    pub fn research(&self) -> &R {
        &self.research
    }

    /// Mutable provider access for hosts whose research state can
    /// regress; follow with `on_settings_changed` or a refresh
    pub fn research_mut(&mut self) -> &mut R {
        &mut self.research
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TableResearch;
    use crate::world::{Area, MemoryPartition};

    fn research_with_stockpiles(complete: bool) -> TableResearch {
        let mut research = TableResearch::new();
        research.insert("ResearchAreas_Stockpiles", "Stockpile Zones", complete);
        research
    }

    #[test]
    fn test_absent_entity_always_allowed() {
        let mut engine = GateEngine::new(GateConfig::default(), research_with_stockpiles(false));
        let partition = MemoryPartition::new("Colony");
        assert_eq!(engine.may_create(None, &partition), Verdict::Allow);
    }

    #[test]
    fn test_override_mutation_through_engine_takes_effect() {
        let mut engine = GateEngine::new(GateConfig::default(), research_with_stockpiles(false));
        let partition = MemoryPartition::new("Colony");
        let area = Area::new("FarmPlot");

        assert!(engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());

        // Mapping the label to a gated category must invalidate the memo
        engine
            .add_override("farmplot", CategoryKey::Stockpile)
            .unwrap();
        assert!(!engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());

        assert!(engine.remove_override("farmplot"));
        assert!(engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());
    }

    #[test]
    fn test_periodic_tick_refreshes_on_interval() {
        let mut engine = GateEngine::new(GateConfig::default(), research_with_stockpiles(false));
        let partition = MemoryPartition::new("Colony");
        let area = Area::new("My Stockpile");

        engine.on_periodic_tick(0);
        assert!(!engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());

        engine
            .research_mut()
            .set_complete("ResearchAreas_Stockpiles", true);

        // Off-interval tick: cached state still wins
        engine.on_periodic_tick(100);
        assert!(!engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());

        engine.on_periodic_tick(250);
        assert!(engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());
    }

    #[test]
    fn test_settings_changed_drops_completion_cache() {
        let mut engine = GateEngine::new(GateConfig::default(), research_with_stockpiles(false));
        let partition = MemoryPartition::new("Colony");
        let area = Area::new("My Stockpile");

        assert!(!engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());

        engine
            .research_mut()
            .set_complete("ResearchAreas_Stockpiles", true);
        engine.on_settings_changed();
        assert!(engine
            .may_create(Some(EntityRef::Area(&area)), &partition)
            .is_allow());
    }

    #[test]
    fn test_register_category_duplicate_rejected() {
        let mut engine = GateEngine::new(GateConfig::default(), research_with_stockpiles(false));
        assert!(engine
            .register_category(CategoryKey::Stockpile, "ResearchAreas_Stockpiles")
            .is_err());
        assert!(engine
            .register_category(CategoryKey::Custom("SnowClear".into()), "ResearchAreas_Shoveling")
            .is_ok());
    }
}
