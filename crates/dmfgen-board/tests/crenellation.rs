use std::sync::Arc;

use approx::assert_abs_diff_eq;
use dmfgen_board::{
    crenellate_electrodes, crenellate_grid, BoardDesign, Constructor, CrenellationError,
    CrenellationParams, Grid, PeripheralDefinition, PeripheralElectrodeDef,
};
use dmfgen_core::Point;
use dmfgen_geometry::Polygon;

fn params(num_digits: u32, theta_deg: f64, margin: f64) -> CrenellationParams {
    CrenellationParams {
        num_digits,
        theta_deg,
        margin,
    }
}

fn filled_grid(size: (u32, u32), pitch: f64) -> Grid {
    let mut grid = Grid::new(Point::new(0.0, 0.0), size, pitch);
    let mut construct = Constructor::new();
    construct.fill_rect(&mut grid, (0, 0), size).unwrap();
    grid
}

fn total_area(grid: &Grid) -> f64 {
    grid.cells.values().map(|e| e.polygon.area()).sum()
}

#[test]
fn adjacent_pair_gains_mirrored_teeth() {
    let mut grid = filled_grid((2, 1), 2.0);
    crenellate_grid(&mut grid, &params(2, 45.0, 0.1)).unwrap();

    let a = grid.electrode((0, 0)).unwrap();
    let b = grid.electrode((1, 0)).unwrap();

    // Two digits with a positive margin insert exactly 4 vertices per
    // polygon: one margin point at each end plus one apex per finger.
    assert_eq!(a.polygon.len(), 8);
    assert_eq!(b.polygon.len(), 8);

    // Material is only reassigned, never created or lost.
    assert_abs_diff_eq!(
        a.polygon.area() + b.polygon.area(),
        8.0,
        epsilon = 1e-9
    );

    // The two new boundaries are the same point set in board coordinates.
    let square = Polygon::square(2.0);
    let mut new_a: Vec<Point> = a
        .board_polygon()
        .points()
        .iter()
        .copied()
        .filter(|p| !square.points().iter().any(|&q| (q + a.frame.origin).distance_to(*p) < 1e-9))
        .collect();
    let mut new_b: Vec<Point> = b
        .board_polygon()
        .points()
        .iter()
        .copied()
        .filter(|p| !square.points().iter().any(|&q| (q + b.frame.origin).distance_to(*p) < 1e-9))
        .collect();
    let key = |p: &Point| (p.y * 1e6) as i64;
    new_a.sort_by_key(key);
    new_b.sort_by_key(key);
    assert_eq!(new_a.len(), 4);
    assert_eq!(new_b.len(), 4);
    for (p, q) in new_a.iter().zip(&new_b) {
        assert_abs_diff_eq!(p.x, q.x, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, q.y, epsilon = 1e-9);
    }

    // All teeth live on the shared boundary x = 2 ± height, inside the
    // margin band.
    for p in &new_a {
        assert!(p.y > 0.05 && p.y < 1.95);
    }

    assert!(a.polygon.is_simple(1e-9));
    assert!(b.polygon.is_simple(1e-9));
}

#[test]
fn grid_wide_crenellation_processes_each_interface_once() {
    let mut grid = filled_grid((2, 2), 2.0);
    let before = total_area(&grid);
    crenellate_grid(&mut grid, &params(2, 60.0, 0.2)).unwrap();

    assert_abs_diff_eq!(total_area(&grid), before, epsilon = 1e-9);
    for e in grid.cells.values() {
        // Each cell touches exactly two interfaces; each adds 4 vertices.
        assert_eq!(e.polygon.len(), 12);
        assert!(e.polygon.is_simple(1e-9));
    }
}

#[test]
fn odd_digit_counts_shift_area_but_conserve_the_union() {
    let mut grid = filled_grid((2, 1), 3.0);
    let before = total_area(&grid);
    crenellate_grid(&mut grid, &params(3, 55.0, 0.3)).unwrap();

    let a = grid.electrode((0, 0)).unwrap();
    let b = grid.electrode((1, 0)).unwrap();
    // With an odd digit count one side nets a tooth.
    assert!((a.polygon.area() - b.polygon.area()).abs() > 1e-6);
    assert_abs_diff_eq!(total_area(&grid), before, epsilon = 1e-9);
}

#[test]
fn no_shared_edge_leaves_both_polygons_unchanged() {
    let mut grid = Grid::new(Point::new(0.0, 0.0), (3, 1), 2.0);
    let mut construct = Constructor::new();
    construct.fill(&mut grid, (0, 0)).unwrap();
    construct.fill(&mut grid, (2, 0)).unwrap();

    let mut a = grid.electrode((0, 0)).unwrap().clone();
    let mut b = grid.electrode((2, 0)).unwrap().clone();
    let err = crenellate_electrodes(&mut a, &mut b, &params(2, 45.0, 0.1)).unwrap_err();
    assert!(matches!(err, CrenellationError::NoSharedEdge { a: 1, b: 2 }));
    assert_eq!(a.polygon.len(), 4);
    assert_eq!(b.polygon.len(), 4);
}

#[test]
fn degenerate_finger_widths_fail_fast() {
    let mut grid = filled_grid((2, 1), 2.0);

    // Margins consume the whole edge.
    let err = crenellate_grid(&mut grid, &params(2, 45.0, 1.0)).unwrap_err();
    assert!(matches!(
        err,
        CrenellationError::InvalidCrenellationParameters { .. }
    ));
    // The failed call mutated nothing.
    for e in grid.cells.values() {
        assert_eq!(e.polygon.len(), 4);
    }

    let err = crenellate_grid(&mut grid, &params(0, 45.0, 0.1)).unwrap_err();
    assert!(matches!(
        err,
        CrenellationError::InvalidCrenellationParameters { .. }
    ));
    let err = crenellate_grid(&mut grid, &params(2, 0.0, 0.1)).unwrap_err();
    assert!(matches!(
        err,
        CrenellationError::InvalidCrenellationParameters { .. }
    ));
}

#[test]
fn grid_cell_crenellates_against_a_peripheral_electrode() {
    let definition = Arc::new(PeripheralDefinition {
        class: "reservoir".to_string(),
        kind: "slab".to_string(),
        origin: Point::new(0.0, 0.0),
        electrodes: vec![PeripheralElectrodeDef {
            label: "A".to_string(),
            polygon: Polygon::new(vec![
                Point::new(0.0, -2.0),
                Point::new(2.0, -2.0),
                Point::new(2.0, 4.0),
                Point::new(0.0, 4.0),
            ])
            .unwrap(),
            anchor: Point::new(1.0, 1.0),
        }],
    });

    let mut board = BoardDesign::new();
    board.create_grid(Point::new(0.0, 0.0), (1, 1), 2.0);
    let mut construct = Constructor::new();
    construct.fill(&mut board.grids[0], (0, 0)).unwrap();
    // The slab's left edge spans y = -2..4 at x = 2, containing the
    // cell's right edge (y = 0..2).
    construct
        .add_peripheral(&mut board, &definition, Point::new(2.0, 0.0), 0.0)
        .unwrap();

    let area_before: f64 = board.all_electrodes().map(|e| e.polygon.area()).sum();

    let (grids, peripherals) = (&mut board.grids, &mut board.peripherals);
    let cell = grids[0].electrode_mut((0, 0)).unwrap();
    let slab = peripherals[0].electrode_mut("A").unwrap();
    crenellate_electrodes(cell, slab, &params(2, 45.0, 0.1)).unwrap();

    // The cell's edge is the shared run; its endpoints prune against the
    // cell corners but subdivide the slab's longer edge.
    assert_eq!(cell.polygon.len(), 8);
    assert_eq!(slab.polygon.len(), 10);
    assert!(cell.polygon.is_simple(1e-9));
    assert!(slab.polygon.is_simple(1e-9));

    let area_after: f64 = board.all_electrodes().map(|e| e.polygon.area()).sum();
    assert_abs_diff_eq!(area_after, area_before, epsilon = 1e-9);
}

#[test]
fn rotated_peripheral_edge_still_matches_the_cell_edge() {
    // A horizontal strip rotated 90° CCW becomes a vertical slab whose
    // long edge lands on the grid cell's right edge.
    let definition = Arc::new(PeripheralDefinition {
        class: "reservoir".to_string(),
        kind: "strip".to_string(),
        origin: Point::new(0.0, 0.0),
        electrodes: vec![PeripheralElectrodeDef {
            label: "A".to_string(),
            polygon: Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(6.0, 0.0),
                Point::new(6.0, 2.0),
                Point::new(0.0, 2.0),
            ])
            .unwrap(),
            anchor: Point::new(3.0, 1.0),
        }],
    });

    let mut board = BoardDesign::new();
    board.create_grid(Point::new(0.0, 0.0), (1, 1), 2.0);
    let mut construct = Constructor::new();
    construct.fill(&mut board.grids[0], (0, 0)).unwrap();
    // Rotated 90° CCW, the strip body occupies x ∈ [2, 4] and its long
    // edge lands on x = 2, spanning y = -2..4.
    construct
        .add_peripheral(&mut board, &definition, Point::new(4.0, -2.0), 90.0)
        .unwrap();

    let (grids, peripherals) = (&mut board.grids, &mut board.peripherals);
    let cell = grids[0].electrode_mut((0, 0)).unwrap();
    let strip = peripherals[0].electrode_mut("A").unwrap();
    crenellate_electrodes(cell, strip, &params(3, 50.0, 0.2)).unwrap();

    assert!(cell.polygon.is_simple(1e-9));
    assert!(strip.polygon.is_simple(1e-9));
    assert_abs_diff_eq!(
        cell.polygon.area() + strip.polygon.area(),
        4.0 + 12.0,
        epsilon = 1e-9
    );
}

#[test]
fn cloned_board_keeps_the_original_geometry() {
    let mut board = BoardDesign::new();
    board.create_grid(Point::new(0.0, 0.0), (2, 1), 2.0);
    let mut construct = Constructor::new();
    construct.fill_rect(&mut board.grids[0], (0, 0), (2, 1)).unwrap();

    let snapshot = board.clone();
    crenellate_grid(&mut board.grids[0], &params(4, 45.0, 0.1)).unwrap();

    assert_eq!(
        snapshot.grids[0].electrode((0, 0)).unwrap().polygon.len(),
        4
    );
    assert!(board.grids[0].electrode((0, 0)).unwrap().polygon.len() > 4);
}
