use dmfgen_core::{Frame, Point};
use indexmap::IndexMap;

use crate::electrode::Electrode;

/// A sparsely populated grid of square electrodes at a fixed pitch.
///
/// `origin` is the board position of the top-left corner of cell (0, 0);
/// columns grow rightward in +x, rows downward in +y. `size` bounds the
/// allocated area; only occupied cells exist in `cells`, keyed by
/// `(col, row)` in fill order.
#[derive(Debug, Clone)]
pub struct Grid {
    pub origin: Point,
    pub size: (u32, u32),
    pub pitch: f64,
    pub cells: IndexMap<(u32, u32), Electrode>,
}

impl Grid {
    #[must_use]
    pub fn new(origin: Point, size: (u32, u32), pitch: f64) -> Self {
        Self {
            origin,
            size,
            pitch,
            cells: IndexMap::new(),
        }
    }

    /// Allocated number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.size.0
    }

    /// Allocated number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.size.1
    }

    #[must_use]
    pub fn contains(&self, cell: (u32, u32)) -> bool {
        cell.0 < self.size.0 && cell.1 < self.size.1
    }

    #[must_use]
    pub fn is_occupied(&self, cell: (u32, u32)) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Local → board frame for a cell; cell polygons have their corner at
    /// the local origin, so adjacent cells tile with shared edges.
    #[must_use]
    pub fn cell_frame(&self, cell: (u32, u32)) -> Frame {
        let offset = Point::new(
            f64::from(cell.0) * self.pitch,
            f64::from(cell.1) * self.pitch,
        );
        Frame::translation(self.origin + offset)
    }

    #[must_use]
    pub fn electrode(&self, cell: (u32, u32)) -> Option<&Electrode> {
        self.cells.get(&cell)
    }

    pub fn electrode_mut(&mut self, cell: (u32, u32)) -> Option<&mut Electrode> {
        self.cells.get_mut(&cell)
    }
}
