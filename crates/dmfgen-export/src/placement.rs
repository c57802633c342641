use std::fs;
use std::path::{Path, PathBuf};

use dmfgen_board::BoardDesign;
use dmfgen_core::Point;
use dmfgen_geometry::{inset, OffsetError, Polygon};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("electrode {designator}: {source}")]
    Offset {
        designator: String,
        source: OffsetError,
    },

    #[error("layout file I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("layout serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Everything the external placement plugin needs for one electrode.
///
/// `copper` is the clearance-inset outline in board coordinates — each of
/// two neighbors gives up `clearance / 2`, so exported boundaries end up
/// exactly `clearance` apart. The design-of-record polygon is untouched.
#[derive(Debug, Clone)]
pub struct ElectrodePlacement {
    pub refdes: u32,
    pub designator: String,
    /// Footprint position, board coordinates.
    pub location: Point,
    /// Footprint rotation for the PCB tool, which turns clockwise where
    /// the board frame turns counter-clockwise.
    pub rotation_deg: f64,
    pub copper: Polygon,
}

/// Compute placements for every electrode on the board. Pure read; safe
/// to call repeatedly.
pub fn electrode_placements(
    board: &BoardDesign,
    clearance: f64,
) -> Result<Vec<ElectrodePlacement>, PlacementError> {
    board
        .all_electrodes()
        .map(|e| {
            let copper =
                inset(&e.board_polygon(), clearance / 2.0).map_err(|source| {
                    PlacementError::Offset {
                        designator: e.designator(),
                        source,
                    }
                })?;
            Ok(ElectrodePlacement {
                refdes: e.refdes,
                designator: e.designator(),
                location: e.frame.origin,
                rotation_deg: -e.frame.rotation_deg,
                copper,
            })
        })
        .collect()
}

/// On-disk layout document consumed by the placement plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDoc {
    pub origin: [f64; 2],
    pub components: IndexMap<String, ComponentDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDoc {
    pub location: [f64; 2],
    pub rotation: f64,
    pub flipped: bool,
    pub footprint: FootprintDoc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintDoc {
    pub path: String,
    pub name: String,
}

/// Build the layout document: one component per electrode, with the
/// footprint named after its designator inside `footprint_library`.
pub fn layout_document(
    board: &BoardDesign,
    board_origin: Point,
    footprint_library: &str,
    clearance: f64,
) -> Result<LayoutDoc, PlacementError> {
    let mut components = IndexMap::new();
    for placement in electrode_placements(board, clearance)? {
        components.insert(
            placement.designator.clone(),
            ComponentDoc {
                location: placement.location.into(),
                rotation: placement.rotation_deg,
                flipped: false,
                footprint: FootprintDoc {
                    path: footprint_library.to_string(),
                    name: format!("electrode_{}", placement.designator),
                },
            },
        );
    }
    Ok(LayoutDoc {
        origin: board_origin.into(),
        components,
    })
}

pub fn save_layout_yaml(path: impl AsRef<Path>, doc: &LayoutDoc) -> Result<(), PlacementError> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(doc)?;
    fs::write(path, yaml).map_err(|source| PlacementError::Io {
        path: path.to_path_buf(),
        source,
    })
}
