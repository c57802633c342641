use std::sync::Arc;

use dmfgen_core::{Frame, Point};
use dmfgen_geometry::Polygon;
use indexmap::IndexMap;

use crate::board::BoardDesign;
use crate::electrode::Electrode;
use crate::grid::Grid;
use crate::peripheral::{PeripheralDefinition, PeripheralInstance};

#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
    #[error("grid cell ({col}, {row}) is already filled")]
    DuplicateCell { col: u32, row: u32 },

    #[error("grid cell ({col}, {row}) is outside the allocated {cols}x{rows} grid")]
    CellOutOfBounds {
        col: i64,
        row: i64,
        cols: u32,
        rows: u32,
    },

    #[error("peripheral \"{kind}\" defines no electrodes")]
    EmptyPeripheral { kind: String },
}

/// Adds electrodes to a design.
///
/// All electrodes for a board must go through the same `Constructor`: it
/// owns the single reference-identifier counter, so refdes values come out
/// unique and sequential in call order across grid fills and peripheral
/// instantiations alike.
#[derive(Debug)]
pub struct Constructor {
    next_refdes: u32,
    next_instance_id: u32,
}

impl Constructor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_refdes: 1,
            next_instance_id: 1,
        }
    }

    fn alloc_refdes(&mut self) -> u32 {
        let refdes = self.next_refdes;
        self.next_refdes += 1;
        refdes
    }

    /// Fill a single grid cell with a fresh square electrode.
    pub fn fill(&mut self, grid: &mut Grid, cell: (u32, u32)) -> Result<(), ConstructError> {
        check_cell(grid, (i64::from(cell.0), i64::from(cell.1)))?;
        self.fill_unchecked(grid, cell);
        Ok(())
    }

    /// Fill an explicit set of cells, in the order given. The whole set is
    /// validated (bounds and occupancy) before any cell is created, so a
    /// failed call leaves the grid untouched.
    pub fn fill_points(
        &mut self,
        grid: &mut Grid,
        cells: &[(u32, u32)],
    ) -> Result<(), ConstructError> {
        for (i, &(col, row)) in cells.iter().enumerate() {
            check_cell(grid, (i64::from(col), i64::from(row)))?;
            if cells[..i].contains(&(col, row)) {
                return Err(ConstructError::DuplicateCell { col, row });
            }
        }
        for &cell in cells {
            self.fill_unchecked(grid, cell);
        }
        Ok(())
    }

    /// Fill a rectangle of cells, row-major. The whole rectangle is
    /// validated (bounds and occupancy) before any cell is created, so a
    /// failed call leaves the grid untouched.
    pub fn fill_rect(
        &mut self,
        grid: &mut Grid,
        pos: (u32, u32),
        size: (u32, u32),
    ) -> Result<(), ConstructError> {
        let mut cells = Vec::with_capacity(size.0 as usize * size.1 as usize);
        for row in pos.1..pos.1 + size.1 {
            for col in pos.0..pos.0 + size.0 {
                cells.push(check_cell(grid, (i64::from(col), i64::from(row)))?);
            }
        }
        for cell in cells {
            self.fill_unchecked(grid, cell);
        }
        Ok(())
    }

    /// Fill a horizontal run starting at `start`. Positive `distance` runs
    /// rightward, negative leftward.
    pub fn fill_horiz(
        &mut self,
        grid: &mut Grid,
        start: (u32, u32),
        distance: i32,
    ) -> Result<(), ConstructError> {
        self.fill_run(grid, start, distance, (1, 0))
    }

    /// Fill a vertical run starting at `start`. Positive `distance` runs
    /// downward, negative upward.
    pub fn fill_vert(
        &mut self,
        grid: &mut Grid,
        start: (u32, u32),
        distance: i32,
    ) -> Result<(), ConstructError> {
        self.fill_run(grid, start, distance, (0, 1))
    }

    fn fill_run(
        &mut self,
        grid: &mut Grid,
        start: (u32, u32),
        distance: i32,
        axis: (i64, i64),
    ) -> Result<(), ConstructError> {
        let step = i64::from(distance.signum());
        let mut cells = Vec::with_capacity(distance.unsigned_abs() as usize);
        for i in 0..i64::from(distance.abs()) {
            let col = i64::from(start.0) + axis.0 * step * i;
            let row = i64::from(start.1) + axis.1 * step * i;
            cells.push(check_cell(grid, (col, row))?);
        }
        for cell in cells {
            self.fill_unchecked(grid, cell);
        }
        Ok(())
    }

    /// Fill cells from an ASCII-art diagram.
    ///
    /// Each line is one row; spaces and underscores leave a cell empty,
    /// any other character fills it. Leading blank lines are skipped, so
    /// an intentionally empty first row is written as a lone `_`.
    pub fn fill_ascii(&mut self, grid: &mut Grid, diagram: &str) -> Result<(), ConstructError> {
        let lines = diagram
            .lines()
            .skip_while(|line| line.trim().is_empty());

        let mut cells = Vec::new();
        for (row, line) in lines.enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' || ch == '_' {
                    continue;
                }
                cells.push(check_cell(grid, (col as i64, row as i64))?);
            }
        }
        for cell in cells {
            self.fill_unchecked(grid, cell);
        }
        Ok(())
    }

    /// Instantiate a peripheral on the board: rotate the definition about
    /// its local origin, land that origin on `placement`, and wrap every
    /// labeled shape in a fresh electrode with the next refdes.
    ///
    /// Returns the instance's index into `board.peripherals`.
    pub fn add_peripheral(
        &mut self,
        board: &mut BoardDesign,
        definition: &Arc<PeripheralDefinition>,
        placement: Point,
        rotation_deg: f64,
    ) -> Result<usize, ConstructError> {
        if definition.is_empty() {
            return Err(ConstructError::EmptyPeripheral {
                kind: definition.kind.clone(),
            });
        }

        let id = self.next_instance_id;
        self.next_instance_id += 1;

        let frame = Frame::new(placement, rotation_deg);
        let mut electrodes = IndexMap::with_capacity(definition.len());
        for def in &definition.electrodes {
            let electrode = Electrode {
                refdes: self.alloc_refdes(),
                label: Some(def.label.clone()),
                polygon: def.polygon.translated(-definition.origin),
                frame,
                anchor: def.anchor - definition.origin,
            };
            electrodes.insert(def.label.clone(), electrode);
        }

        board.peripherals.push(PeripheralInstance {
            definition: Arc::clone(definition),
            id,
            placement: frame,
            electrodes,
        });
        Ok(board.peripherals.len() - 1)
    }

    fn fill_unchecked(&mut self, grid: &mut Grid, cell: (u32, u32)) {
        let electrode = Electrode {
            refdes: self.alloc_refdes(),
            label: None,
            polygon: Polygon::square(grid.pitch),
            frame: grid.cell_frame(cell),
            anchor: Point::new(grid.pitch / 2.0, grid.pitch / 2.0),
        };
        grid.cells.insert(cell, electrode);
    }
}

impl Default for Constructor {
    fn default() -> Self {
        Self::new()
    }
}

fn check_cell(grid: &Grid, (col, row): (i64, i64)) -> Result<(u32, u32), ConstructError> {
    let (cols, rows) = grid.size;
    if col < 0 || row < 0 || col >= i64::from(cols) || row >= i64::from(rows) {
        return Err(ConstructError::CellOutOfBounds {
            col,
            row,
            cols,
            rows,
        });
    }
    let cell = (col as u32, row as u32);
    if grid.is_occupied(cell) {
        return Err(ConstructError::DuplicateCell {
            col: cell.0,
            row: cell.1,
        });
    }
    Ok(cell)
}
