//! External interface payloads: peripheral definition files, placement
//! layouts for the PCB tool, net-to-pin resolution, and the
//! board-definition layout consumed by downstream control software.

pub mod netlist;
pub mod peripheral_file;
pub mod placement;

pub use netlist::{
    board_definition_layout, parse_pin_number, resolve_pin_table, save_board_definition_json,
    BoardDefinitionDoc, NetlistError,
};
pub use peripheral_file::{load_peripheral, save_peripheral, PeripheralFileError};
pub use placement::{
    electrode_placements, layout_document, save_layout_yaml, ElectrodePlacement, LayoutDoc,
    PlacementError,
};
