//! Reconciliation sweep
//!
//! After a session load or ruleset change, walks every live area and
//! gateable zone, removes those whose research requirement is no longer
//! satisfied, and reports what was removed per partition. Removal is
//! best-effort: one failed host removal never aborts the sweep.

use crate::classify::EntityClassifier;
use crate::completion::CompletionCache;
use crate::core::config::GateConfig;
use crate::core::types::{EntityId, Tick};
use crate::decision::{evaluate, Verdict};
use crate::host::ResearchProvider;
use crate::registry::RequirementRegistry;
use crate::world::{EntityRef, Partition};

/// Removals performed on a single partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReport {
    pub partition: String,
    pub removed: Vec<String>,
}

/// Outcome of a full reconciliation sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub partitions: Vec<PartitionReport>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn total_removed(&self) -> usize {
        self.partitions.iter().map(|p| p.removed.len()).sum()
    }

    /// One summary line per partition, for player notification
    pub fn summaries(&self) -> Vec<String> {
        self.partitions
            .iter()
            .map(|p| {
                format!(
                    "Removed {} area(s) from {} due to missing research: {}",
                    p.removed.len(),
                    p.partition,
                    p.removed.join(", ")
                )
            })
            .collect()
    }
}

#[derive(Debug)]
enum ViolatorKind {
    Area,
    Zone,
}

#[derive(Debug)]
struct Violator {
    id: EntityId,
    label: String,
    kind: ViolatorKind,
    in_use: bool,
}

/// Sweep one partition, removing every gated entity whose requirement
/// is unmet; returns removed labels in enumeration order
pub fn sweep_partition(
    partition: &mut dyn Partition,
    config: &GateConfig,
    registry: &RequirementRegistry,
    completion: &mut CompletionCache,
    classifier: &mut EntityClassifier,
    research: &dyn ResearchProvider,
    tick: Tick,
) -> Vec<String> {
    classifier.begin_partition();

    let default_area = partition.default_area();
    let mut violators = Vec::new();

    for area in partition.areas() {
        // The default/home area is never swept
        if Some(area.id) == default_area {
            continue;
        }
        let class = classifier.classify(EntityRef::Area(area), &*partition, &config.overrides, tick);
        let verdict = evaluate(&class, config, registry, completion, research);
        if let Verdict::Deny { .. } = verdict {
            violators.push(Violator {
                id: area.id,
                label: area.label.clone(),
                kind: ViolatorKind::Area,
                in_use: partition.area_in_use(area.id),
            });
        }
    }

    for zone in partition.zones() {
        if !zone.kind.is_gateable() {
            continue;
        }
        let class = classifier.classify(EntityRef::Zone(zone), &*partition, &config.overrides, tick);
        let verdict = evaluate(&class, config, registry, completion, research);
        if let Verdict::Deny { .. } = verdict {
            violators.push(Violator {
                id: zone.id,
                label: zone.label.clone(),
                kind: ViolatorKind::Zone,
                in_use: zone.contained_things > 0,
            });
        }
    }

    let mut removed = Vec::new();
    for violator in violators {
        // In-use status affects log severity only; removal proceeds and
        // the host's own removal routine drops contents / unassigns actors
        if violator.in_use && config.warn_on_removal {
            tracing::warn!(
                "Removing {} '{}' that may be in use",
                kind_name(&violator.kind),
                violator.label
            );
        }
        let result = match violator.kind {
            ViolatorKind::Area => partition.remove_area(violator.id),
            ViolatorKind::Zone => partition.remove_zone(violator.id),
        };
        match result {
            Ok(()) => {
                classifier.forget(violator.id);
                tracing::debug!(
                    "Removed {} '{}'",
                    kind_name(&violator.kind),
                    violator.label
                );
                removed.push(violator.label);
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to remove {} '{}': {}",
                    kind_name(&violator.kind),
                    violator.label,
                    err
                );
            }
        }
    }
    removed
}

fn kind_name(kind: &ViolatorKind) -> &'static str {
    match kind {
        ViolatorKind::Area => "area",
        ViolatorKind::Zone => "zone",
    }
}

/// Sweep every loaded partition; partitions with no removals are
/// omitted from the report
pub fn sweep(
    partitions: &mut [&mut dyn Partition],
    config: &GateConfig,
    registry: &RequirementRegistry,
    completion: &mut CompletionCache,
    classifier: &mut EntityClassifier,
    research: &dyn ResearchProvider,
    tick: Tick,
) -> SweepReport {
    let mut report = SweepReport::default();
    for partition in partitions.iter_mut() {
        let removed = sweep_partition(
            &mut **partition,
            config,
            registry,
            completion,
            classifier,
            research,
            tick,
        );
        if !removed.is_empty() {
            let name = partition.display_name().unwrap_or("Unknown").to_owned();
            report.partitions.push(PartitionReport {
                partition: name,
                removed,
            });
        }
    }
    report
}
