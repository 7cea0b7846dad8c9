//! Requirement completion cache
//!
//! Host completion checks are treated as expensive, so results are
//! memoized. The cache is rebuilt eagerly at session load and on a fixed
//! tick interval, and can be dropped outright when settings change or
//! the host state regresses (debug tools, ruleset swap).

use ahash::AHashMap;

use crate::core::types::{RequirementId, Tick};
use crate::host::ResearchProvider;
use crate::registry::RequirementRegistry;

/// Ticks between periodic completion refreshes (~4 in-game seconds)
pub const REFRESH_INTERVAL_TICKS: Tick = 250;

#[derive(Debug, Default)]
pub struct CompletionCache {
    satisfied: AHashMap<RequirementId, bool>,
    last_refresh: Option<Tick>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a requirement is satisfied; no requirement means no gate
    ///
    /// On a miss the host is queried once and the answer memoized until
    /// the next refresh or invalidation.
    pub fn is_satisfied(
        &mut self,
        requirement: Option<RequirementId>,
        research: &dyn ResearchProvider,
    ) -> bool {
        let Some(id) = requirement else {
            return true;
        };
        if let Some(&cached) = self.satisfied.get(&id) {
            return cached;
        }
        let complete = research.is_complete(id);
        self.satisfied.insert(id, complete);
        complete
    }

    /// Eagerly recompute completion for every registered requirement
    pub fn refresh(
        &mut self,
        registry: &RequirementRegistry,
        research: &dyn ResearchProvider,
        tick: Tick,
    ) {
        self.satisfied.clear();
        for id in registry.requirements() {
            self.satisfied.insert(id, research.is_complete(id));
        }
        self.last_refresh = Some(tick);
        tracing::debug!(
            "Completion cache refreshed at tick {} ({} requirements)",
            tick,
            self.satisfied.len()
        );
    }

    /// Drop all cached state without recomputing
    pub fn invalidate(&mut self) {
        self.satisfied.clear();
        self.last_refresh = None;
    }

    pub fn last_refresh(&self) -> Option<Tick> {
        self.last_refresh
    }
}
