//! Host-facing service contracts
//!
//! The gate consumes exactly two services from its host: research
//! completion lookups and player-facing messaging. Both are injected as
//! traits so the engine can be driven by the real host or by the
//! in-memory doubles below.

use ahash::AHashMap;
use std::cell::Cell;

use crate::core::types::RequirementId;

/// Research completion lookups against the host ruleset
pub trait ResearchProvider {
    /// Resolve an external research identifier; `None` when the current
    /// ruleset does not define it
    fn lookup(&self, identifier: &str) -> Option<RequirementId>;

    /// Current completion state for a resolved project
    fn is_complete(&self, id: RequirementId) -> bool;

    /// Display label used in denial messages
    fn label(&self, id: RequirementId) -> Option<&str>;
}

/// Message severity, mirroring the host's message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Neutral,
    RejectInput,
    Warning,
}

/// Fire-and-forget player notification channel
pub trait Messenger {
    fn notify(&mut self, text: &str, severity: Severity);
}

/// Messenger that routes notifications into the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn notify(&mut self, text: &str, severity: Severity) {
        match severity {
            Severity::Warning => tracing::warn!("{}", text),
            Severity::Neutral | Severity::RejectInput => tracing::info!("{}", text),
        }
    }
}

#[derive(Debug)]
struct ResearchEntry {
    label: String,
    complete: bool,
}

/// In-memory research table backing the demo binary and tests
#[derive(Debug, Default)]
pub struct TableResearch {
    projects: Vec<ResearchEntry>,
    by_identifier: AHashMap<String, RequirementId>,
    // Completion checks answered; the caches are supposed to keep this small
    completion_queries: Cell<u64>,
}

impl TableResearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project; returns its handle. Re-inserting an identifier
    /// replaces the entry and keeps the handle stable.
    pub fn insert(&mut self, identifier: &str, label: &str, complete: bool) -> RequirementId {
        if let Some(&id) = self.by_identifier.get(identifier) {
            self.projects[id.0 as usize] = ResearchEntry {
                label: label.to_owned(),
                complete,
            };
            return id;
        }
        let id = RequirementId(self.projects.len() as u32);
        self.projects.push(ResearchEntry {
            label: label.to_owned(),
            complete,
        });
        self.by_identifier.insert(identifier.to_owned(), id);
        id
    }

    /// Flip completion state; returns false when the identifier is unknown
    pub fn set_complete(&mut self, identifier: &str, complete: bool) -> bool {
        match self.by_identifier.get(identifier) {
            Some(&id) => {
                self.projects[id.0 as usize].complete = complete;
                true
            }
            None => false,
        }
    }

    /// Number of completion checks served so far
    pub fn completion_queries(&self) -> u64 {
        self.completion_queries.get()
    }
}

impl ResearchProvider for TableResearch {
    fn lookup(&self, identifier: &str) -> Option<RequirementId> {
        self.by_identifier.get(identifier).copied()
    }

    fn is_complete(&self, id: RequirementId) -> bool {
        self.completion_queries.set(self.completion_queries.get() + 1);
        self.projects
            .get(id.0 as usize)
            .map(|p| p.complete)
            .unwrap_or(false)
    }

    fn label(&self, id: RequirementId) -> Option<&str> {
        self.projects.get(id.0 as usize).map(|p| p.label.as_str())
    }
}
