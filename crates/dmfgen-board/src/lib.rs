//! Entity model and construction tools for DMF electrode board designs:
//! boards, sparse electrode grids, peripheral templates and instances,
//! the refdes-allocating [`Constructor`], and the crenellation engine.

pub mod board;
pub mod construct;
pub mod crenellate;
pub mod electrode;
pub mod grid;
pub mod peripheral;

pub use board::BoardDesign;
pub use construct::{ConstructError, Constructor};
pub use crenellate::{
    crenellate_electrodes, crenellate_grid, CrenellationError, CrenellationParams,
};
pub use electrode::Electrode;
pub use grid::Grid;
pub use peripheral::{PeripheralDefinition, PeripheralElectrodeDef, PeripheralInstance};
