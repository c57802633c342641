use std::fs;
use std::path::{Path, PathBuf};

use dmfgen_board::{PeripheralDefinition, PeripheralElectrodeDef};
use dmfgen_core::Point;
use dmfgen_geometry::{Polygon, PolygonError};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PeripheralFileError {
    #[error("peripheral file I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("peripheral file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("peripheral electrode \"{label}\" has an invalid polygon: {source}")]
    InvalidPolygon {
        label: String,
        source: PolygonError,
    },
}

/// On-disk shape of a peripheral definition. Coordinates are flat
/// `[x, y]` pairs in the definition's local frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeripheralDoc {
    pub class: String,
    pub kind: String,
    pub origin: [f64; 2],
    pub electrodes: Vec<ElectrodeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectrodeDoc {
    pub label: String,
    pub polygon: Vec<[f64; 2]>,
    pub anchor: [f64; 2],
}

pub fn to_document(definition: &PeripheralDefinition) -> PeripheralDoc {
    PeripheralDoc {
        class: definition.class.clone(),
        kind: definition.kind.clone(),
        origin: definition.origin.into(),
        electrodes: definition
            .electrodes
            .iter()
            .map(|e| ElectrodeDoc {
                label: e.label.clone(),
                polygon: e.polygon.points().iter().map(|&p| p.into()).collect(),
                anchor: e.anchor.into(),
            })
            .collect(),
    }
}

pub fn from_document(doc: PeripheralDoc) -> Result<PeripheralDefinition, PeripheralFileError> {
    let mut electrodes = Vec::with_capacity(doc.electrodes.len());
    for e in doc.electrodes {
        let points: Vec<Point> = e.polygon.into_iter().map(Point::from).collect();
        let polygon = Polygon::new(points).map_err(|source| {
            PeripheralFileError::InvalidPolygon {
                label: e.label.clone(),
                source,
            }
        })?;
        electrodes.push(PeripheralElectrodeDef {
            label: e.label,
            polygon,
            anchor: e.anchor.into(),
        });
    }
    Ok(PeripheralDefinition {
        class: doc.class,
        kind: doc.kind,
        origin: doc.origin.into(),
        electrodes,
    })
}

/// Write a peripheral definition as pretty-printed JSON.
pub fn save_peripheral(
    path: impl AsRef<Path>,
    definition: &PeripheralDefinition,
) -> Result<(), PeripheralFileError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&to_document(definition))?;
    fs::write(path, json).map_err(|source| PeripheralFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a peripheral definition back; exact inverse of
/// [`save_peripheral`] within float tolerance.
pub fn load_peripheral(path: impl AsRef<Path>) -> Result<PeripheralDefinition, PeripheralFileError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| PeripheralFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: PeripheralDoc = serde_json::from_str(&json)?;
    from_document(doc)
}
