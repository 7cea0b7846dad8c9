//! Research-gated area and zone rules
//!
//! Gameplay-rule gate for colony-simulation hosts: classifies
//! player-designated areas and zones into rule categories, resolves
//! each category to a prerequisite research project, blocks creation
//! while the research is incomplete, and reconciles a loaded world
//! against the current ruleset by removing entities that no longer
//! qualify.

pub mod classify;
pub mod completion;
pub mod core;
pub mod decision;
pub mod engine;
pub mod host;
pub mod registry;
pub mod sweep;
pub mod world;

pub use crate::core::config::{GateConfig, OverrideMap};
pub use crate::core::error::{GateError, Result};
pub use crate::core::types::{CategoryKey, EntityId, RequirementId, Tick};
pub use crate::decision::Verdict;
pub use crate::engine::GateEngine;
pub use crate::sweep::SweepReport;
