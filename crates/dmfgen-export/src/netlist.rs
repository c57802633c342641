use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use dmfgen_board::BoardDesign;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    #[error("net \"{net}\" on {designator} does not match the /P<pin> form")]
    NetNameFormatError { designator: String, net: String },

    #[error("no net assignment found for electrode {designator}")]
    MissingNetAssignment { designator: String },

    #[error("board definition I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("board definition serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn pin_net_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/P([0-9]+)$").expect("pin net pattern is valid"))
}

/// Extract the pin number from a net name of the fixed form `/P{integer}`.
#[must_use]
pub fn parse_pin_number(net: &str) -> Option<u32> {
    pin_net_pattern()
        .captures(net)
        .and_then(|caps| caps[1].parse().ok())
}

/// Convert a designator → net-name table (as read from the routed PCB)
/// into a designator → pin-number table.
///
/// Any net name outside the `/P{integer}` form fails the whole call,
/// naming the offending net; the PCB design is expected to be fixed and
/// the call retried.
pub fn resolve_pin_table(
    nets: &IndexMap<String, String>,
) -> Result<IndexMap<String, u32>, NetlistError> {
    let mut pins = IndexMap::with_capacity(nets.len());
    for (designator, net) in nets {
        let pin = parse_pin_number(net).ok_or_else(|| NetlistError::NetNameFormatError {
            designator: designator.clone(),
            net: net.clone(),
        })?;
        pins.insert(designator.clone(), pin);
    }
    Ok(pins)
}

/// Board-definition layout consumed by the droplet control software:
/// designator, pin, and the original (un-crenellated) outline per
/// electrode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDefinitionDoc {
    pub electrodes: Vec<BoardDefElectrodeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDefElectrodeDoc {
    pub designator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub pin: u32,
    /// Board-coordinate vertices.
    pub polygon: Vec<[f64; 2]>,
}

/// Build the board-definition layout from the pre-crenellation board
/// snapshot. Every electrode must have a pin assignment; a missing entry
/// fails the whole call (retry once routing is finished).
pub fn board_definition_layout(
    board: &BoardDesign,
    pins: &IndexMap<String, u32>,
) -> Result<BoardDefinitionDoc, NetlistError> {
    let mut electrodes = Vec::with_capacity(board.electrode_count());
    for electrode in board.all_electrodes() {
        let designator = electrode.designator();
        let pin = *pins
            .get(&designator)
            .ok_or_else(|| NetlistError::MissingNetAssignment {
                designator: designator.clone(),
            })?;
        electrodes.push(BoardDefElectrodeDoc {
            designator,
            label: electrode.label.clone(),
            pin,
            polygon: electrode
                .board_polygon()
                .points()
                .iter()
                .map(|&p| p.into())
                .collect(),
        });
    }
    Ok(BoardDefinitionDoc { electrodes })
}

pub fn save_board_definition_json(
    path: impl AsRef<Path>,
    doc: &BoardDefinitionDoc,
) -> Result<(), NetlistError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json).map_err(|source| NetlistError::Io {
        path: path.to_path_buf(),
        source,
    })
}
