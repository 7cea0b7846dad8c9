//! Gate verdicts
//!
//! Pure decision step: given a classification, the configuration, and
//! the caches, decide whether the entity may exist and say why not.

use crate::classify::Classification;
use crate::completion::CompletionCache;
use crate::core::config::GateConfig;
use crate::host::ResearchProvider;
use crate::registry::RequirementRegistry;

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny { reason: String },
}

impl Verdict {
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Allow => None,
            Verdict::Deny { reason } => Some(reason),
        }
    }
}

/// Decide whether an entity with the given classification may exist
///
/// Idempotent: two calls with no intervening cache or config change
/// return the same verdict.
pub fn evaluate(
    classification: &Classification,
    config: &GateConfig,
    registry: &RequirementRegistry,
    completion: &mut CompletionCache,
    research: &dyn ResearchProvider,
) -> Verdict {
    let category = match classification {
        Classification::Exempt => return Verdict::Allow,
        Classification::Category(category) => category,
    };

    if !config.is_enforced(category) {
        return Verdict::Allow;
    }

    // Unresolvable requirement means the category is not gated
    let Some(requirement) = registry.resolve(category) else {
        return Verdict::Allow;
    };

    if completion.is_satisfied(Some(requirement), research) {
        return Verdict::Allow;
    }

    let name = research
        .label(requirement)
        .map(str::to_owned)
        .or_else(|| registry.identifier(category).map(str::to_owned))
        .unwrap_or_else(|| category.to_string());
    Verdict::Deny {
        reason: format!("Requires research: {}", name),
    }
}
