//! Minimal world model: areas, zones, partitions
//!
//! This mirrors the slice of the host world the gate reads and mutates.
//! An `Area` is a named boolean tile-membership region; a `Zone` is a
//! typed region with possible item/plant occupancy. Each partition (a
//! loaded map) exposes its live entities and a removal API through the
//! `Partition` trait; `MemoryPartition` is the in-memory implementation
//! used by the demo binary and tests.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{GateError, Result};
use crate::core::types::EntityId;

/// Structural kind of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Stockpile,
    Growing,
    /// Zone types the gate does not manage
    Other,
}

impl ZoneKind {
    /// Whether zones of this kind are subject to gating
    pub fn is_gateable(self) -> bool {
        matches!(self, ZoneKind::Stockpile | ZoneKind::Growing)
    }
}

/// A named boolean tile-membership region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: EntityId,
    pub label: String,
}

impl Area {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            label: label.into(),
        }
    }
}

/// A typed region with possible item/plant occupancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: EntityId,
    pub label: String,
    pub kind: ZoneKind,
    /// Items or plants currently inside the zone
    pub contained_things: u32,
}

impl Zone {
    pub fn new(label: impl Into<String>, kind: ZoneKind) -> Self {
        Self {
            id: EntityId::new(),
            label: label.into(),
            kind,
            contained_things: 0,
        }
    }

    pub fn with_contents(mut self, count: u32) -> Self {
        self.contained_things = count;
        self
    }
}

/// Reference to a live entity, dispatched by shape
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Area(&'a Area),
    Zone(&'a Zone),
}

impl<'a> EntityRef<'a> {
    pub fn id(&self) -> EntityId {
        match *self {
            EntityRef::Area(area) => area.id,
            EntityRef::Zone(zone) => zone.id,
        }
    }

    pub fn label(&self) -> &'a str {
        match *self {
            EntityRef::Area(area) => &area.label,
            EntityRef::Zone(zone) => &zone.label,
        }
    }

    /// Structural signal; `None` for areas, which carry no zone kind
    pub fn structural_kind(&self) -> Option<ZoneKind> {
        match *self {
            EntityRef::Area(_) => None,
            EntityRef::Zone(zone) => Some(zone.kind),
        }
    }
}

/// The slice of a loaded world partition the gate needs
pub trait Partition {
    /// Display name for reports; `None` falls back to "Unknown"
    fn display_name(&self) -> Option<&str>;

    fn areas(&self) -> &[Area];

    fn zones(&self) -> &[Zone];

    /// The protected default/home area, if the partition has one
    fn default_area(&self) -> Option<EntityId>;

    /// True when any actor is currently restricted to the area
    fn area_in_use(&self, area: EntityId) -> bool;

    fn remove_area(&mut self, area: EntityId) -> Result<()>;

    fn remove_zone(&mut self, zone: EntityId) -> Result<()>;
}

/// In-memory partition backing the demo binary and tests
#[derive(Debug, Default)]
pub struct MemoryPartition {
    name: Option<String>,
    areas: Vec<Area>,
    zones: Vec<Zone>,
    default_area: Option<EntityId>,
    /// actor -> area restriction assignments
    restrictions: AHashMap<EntityId, EntityId>,
}

impl MemoryPartition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn add_area(&mut self, area: Area) -> EntityId {
        let id = area.id;
        self.areas.push(area);
        id
    }

    /// Add the partition's protected default/home area
    pub fn add_default_area(&mut self, label: impl Into<String>) -> EntityId {
        let id = self.add_area(Area::new(label));
        self.default_area = Some(id);
        id
    }

    pub fn add_zone(&mut self, zone: Zone) -> EntityId {
        let id = zone.id;
        self.zones.push(zone);
        id
    }

    /// Restrict an actor to an area, marking the area as in use
    pub fn restrict_actor(&mut self, actor: EntityId, area: EntityId) {
        self.restrictions.insert(actor, area);
    }

    pub fn area(&self, id: EntityId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn zone(&self, id: EntityId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }
}

impl Partition for MemoryPartition {
    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn areas(&self) -> &[Area] {
        &self.areas
    }

    fn zones(&self) -> &[Zone] {
        &self.zones
    }

    fn default_area(&self) -> Option<EntityId> {
        self.default_area
    }

    fn area_in_use(&self, area: EntityId) -> bool {
        self.restrictions.values().any(|&assigned| assigned == area)
    }

    fn remove_area(&mut self, area: EntityId) -> Result<()> {
        let idx = self
            .areas
            .iter()
            .position(|a| a.id == area)
            .ok_or(GateError::EntityNotFound(area))?;
        // Vec::remove keeps enumeration order stable for later sweeps
        self.areas.remove(idx);
        self.restrictions.retain(|_, assigned| *assigned != area);
        Ok(())
    }

    fn remove_zone(&mut self, zone: EntityId) -> Result<()> {
        let idx = self
            .zones
            .iter()
            .position(|z| z.id == zone)
            .ok_or(GateError::EntityNotFound(zone))?;
        self.zones.remove(idx);
        Ok(())
    }
}
