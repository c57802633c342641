use dmfgen_core::Point;

use crate::electrode::Electrode;
use crate::grid::Grid;
use crate::peripheral::PeripheralInstance;

/// Top-level container for a board design.
///
/// Cloning produces a deep snapshot; the usual flow clones the board just
/// before crenellation so the un-jagged geometry stays available for the
/// board-definition export.
#[derive(Debug, Clone, Default)]
pub struct BoardDesign {
    pub grids: Vec<Grid>,
    pub peripherals: Vec<PeripheralInstance>,
}

impl BoardDesign {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid on this board and return it for filling.
    pub fn create_grid(&mut self, origin: Point, size: (u32, u32), pitch: f64) -> &mut Grid {
        self.grids.push(Grid::new(origin, size, pitch));
        let last = self.grids.len() - 1;
        &mut self.grids[last]
    }

    /// All electrodes on the board, grids first, in insertion order.
    pub fn all_electrodes(&self) -> impl Iterator<Item = &Electrode> {
        self.grids
            .iter()
            .flat_map(|grid| grid.cells.values())
            .chain(
                self.peripherals
                    .iter()
                    .flat_map(|instance| instance.electrodes.values()),
            )
    }

    #[must_use]
    pub fn electrode_count(&self) -> usize {
        self.all_electrodes().count()
    }
}
