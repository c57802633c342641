use std::sync::Arc;

use dmfgen_core::{Frame, Point};
use dmfgen_geometry::Polygon;
use indexmap::IndexMap;

use crate::electrode::Electrode;

/// One labeled electrode shape inside a peripheral template.
#[derive(Debug, Clone)]
pub struct PeripheralElectrodeDef {
    pub label: String,
    /// Outline in the definition's local frame.
    pub polygon: Polygon,
    /// Footprint pad anchor, definition-local frame.
    pub anchor: Point,
}

/// A named, reusable cluster of electrode shapes (a reservoir, for
/// example), authored once and instantiated at multiple board locations.
///
/// Immutable once loaded; instances share it behind an [`Arc`] and apply
/// their placement transform lazily, never mutating the template.
#[derive(Debug, Clone)]
pub struct PeripheralDefinition {
    /// Broad category, e.g. "reservoir".
    pub class: String,
    /// Unique type name within the class.
    pub kind: String,
    /// Instantiation reference point in the definition's local frame; the
    /// placement position lands here.
    pub origin: Point,
    pub electrodes: Vec<PeripheralElectrodeDef>,
}

impl PeripheralDefinition {
    #[must_use]
    pub fn len(&self) -> usize {
        self.electrodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.electrodes.is_empty()
    }
}

/// A placed copy of a [`PeripheralDefinition`], with its own electrodes.
///
/// Lookups return the instance's electrodes (with board placement and
/// refdes applied), never the shared template shapes.
#[derive(Debug, Clone)]
pub struct PeripheralInstance {
    pub definition: Arc<PeripheralDefinition>,
    /// Sequential instance id, unique per board.
    pub id: u32,
    /// Definition-local → board transform.
    pub placement: Frame,
    pub electrodes: IndexMap<String, Electrode>,
}

impl PeripheralInstance {
    #[must_use]
    pub fn electrode(&self, label: &str) -> Option<&Electrode> {
        self.electrodes.get(label)
    }

    pub fn electrode_mut(&mut self, label: &str) -> Option<&mut Electrode> {
        self.electrodes.get_mut(label)
    }
}
