use dmfgen_core::Point;
use dmfgen_geometry::segment::segments_overlap;
use tracing::debug;

use crate::electrode::Electrode;
use crate::grid::Grid;

/// Fingers narrower than this are degenerate.
const MIN_FINGER_WIDTH: f64 = 1e-9;

/// Consecutive run points closer than this collapse (margin 0 makes the
/// run start coincide with the edge corner).
const RUN_DEDUP_EPS: f64 = 1e-9;

#[derive(Debug, thiserror::Error)]
pub enum CrenellationError {
    #[error("electrodes E{a} and E{b} share no edge to crenellate")]
    NoSharedEdge { a: u32, b: u32 },

    #[error("invalid crenellation parameters: {reason}")]
    InvalidCrenellationParameters { reason: String },
}

/// Tooth parameters for one crenellated interface.
#[derive(Debug, Clone, Copy)]
pub struct CrenellationParams {
    /// Number of interleaved fingers along the shared run.
    pub num_digits: u32,
    /// Apex angle of each tooth, degrees.
    pub theta_deg: f64,
    /// Length left untouched at each end of the shared run, so teeth stay
    /// clear of the polygon corners.
    pub margin: f64,
}

/// Replace the straight shared boundary between two abutting electrodes
/// with an interleaved toothed boundary.
///
/// The zigzag vertex run is computed once from the shared edge and
/// inserted into both polygons (reversed where an edge runs the other
/// way), so the two new boundaries are exact mirror images: material is
/// only reassigned between the electrodes, and their union is unchanged.
/// Detection and synthesis both complete before either polygon mutates.
pub fn crenellate_electrodes(
    a: &mut Electrode,
    b: &mut Electrode,
    params: &CrenellationParams,
) -> Result<(), CrenellationError> {
    let (plan_a, plan_b) = plan_crenellation(a, b, params)?;
    plan_a.apply(a);
    plan_b.apply(b);
    Ok(())
}

/// Crenellate every pair of lattice-adjacent occupied cells in a grid,
/// each pair exactly once, row-major.
pub fn crenellate_grid(grid: &mut Grid, params: &CrenellationParams) -> Result<(), CrenellationError> {
    let mut cells: Vec<(u32, u32)> = grid.cells.keys().copied().collect();
    cells.sort_unstable_by_key(|&(col, row)| (row, col));

    for &(col, row) in &cells {
        for other in [(col + 1, row), (col, row + 1)] {
            let (Some(a), Some(b)) = (grid.electrode((col, row)), grid.electrode(other)) else {
                continue;
            };
            debug!(cell = ?(col, row), neighbor = ?other, "crenellating shared grid edge");
            let (plan_a, plan_b) = plan_crenellation(a, b, params)?;
            if let Some(a) = grid.electrode_mut((col, row)) {
                plan_a.apply(a);
            }
            if let Some(b) = grid.electrode_mut(other) {
                plan_b.apply(b);
            }
        }
    }
    Ok(())
}

/// A pending vertex insertion: the board-frame run subdividing edge
/// `edge` of one electrode.
struct InsertPlan {
    edge: usize,
    run: Vec<Point>,
}

impl InsertPlan {
    fn apply(&self, electrode: &mut Electrode) {
        electrode.insert_board_points(self.edge + 1, &self.run);
    }
}

fn plan_crenellation(
    a: &Electrode,
    b: &Electrode,
    params: &CrenellationParams,
) -> Result<(InsertPlan, InsertPlan), CrenellationError> {
    validate_params(params)?;

    let (edge_a, edge_b) =
        find_shared_edge(a, b).ok_or(CrenellationError::NoSharedEdge {
            a: a.refdes,
            b: b.refdes,
        })?;

    let seg_a = a.board_edge(edge_a);
    let seg_b = b.board_edge(edge_b);

    // The contained edge is the shared run; with equal edges either works.
    let len_a = (seg_a.1 - seg_a.0).norm();
    let len_b = (seg_b.1 - seg_b.0).norm();
    let run = if len_a <= len_b { seg_a } else { seg_b };

    let zigzag = crenellated_run(run.0, run.1, params)?;

    let oriented = |seg: (Point, Point)| {
        let flipped = (seg.1 - seg.0).dot(run.1 - run.0) < 0.0;
        if flipped {
            zigzag.iter().rev().copied().collect()
        } else {
            zigzag.clone()
        }
    };

    Ok((
        InsertPlan {
            edge: edge_a,
            run: oriented(seg_a),
        },
        InsertPlan {
            edge: edge_b,
            run: oriented(seg_b),
        },
    ))
}

fn validate_params(params: &CrenellationParams) -> Result<(), CrenellationError> {
    let fail = |reason: String| CrenellationError::InvalidCrenellationParameters { reason };

    if params.num_digits == 0 {
        return Err(fail("digit count must be at least 1".into()));
    }
    if !(params.theta_deg > 0.0 && params.theta_deg < 180.0) {
        return Err(fail(format!(
            "tooth angle must be between 0 and 180 degrees exclusive (got {})",
            params.theta_deg
        )));
    }
    if !params.margin.is_finite() || params.margin < 0.0 {
        return Err(fail(format!(
            "margin must be finite and non-negative (got {})",
            params.margin
        )));
    }
    Ok(())
}

/// Build the interleaved zigzag along the run from `start` to `end`,
/// endpoints included: a margin point at each end, then one apex per
/// finger alternating sides of the run.
fn crenellated_run(
    start: Point,
    end: Point,
    params: &CrenellationParams,
) -> Result<Vec<Point>, CrenellationError> {
    let length = start.distance_to(end);
    let digits = f64::from(params.num_digits);
    let finger_width = (length - 2.0 * params.margin) / digits;
    if finger_width <= MIN_FINGER_WIDTH {
        return Err(CrenellationError::InvalidCrenellationParameters {
            reason: format!(
                "margin {} with {} digits leaves no finger width on a {:.4} mm edge",
                params.margin, params.num_digits, length
            ),
        });
    }
    let height = (finger_width / 2.0) / (params.theta_deg.to_radians() / 2.0).tan();

    let u = (end - start) * (1.0 / length);
    let v = u.perp();
    let at = |x: f64, y: f64| start + u * x + v * y;

    let mut pts = Vec::with_capacity(params.num_digits as usize + 4);
    pts.push(start);
    pts.push(at(params.margin, 0.0));
    for i in 0..params.num_digits {
        let x = params.margin + finger_width / 2.0 + finger_width * f64::from(i);
        let y = if i % 2 == 0 { height } else { -height };
        pts.push(at(x, y));
    }
    pts.push(at(length - params.margin, 0.0));
    pts.push(end);

    // Zero margin makes the margin points coincide with the endpoints.
    pts.dedup_by(|p, q| p.distance_to(*q) < RUN_DEDUP_EPS);
    Ok(pts)
}

fn find_shared_edge(a: &Electrode, b: &Electrode) -> Option<(usize, usize)> {
    for edge_a in 0..a.polygon.len() {
        for edge_b in 0..b.polygon.len() {
            if segments_overlap(a.board_edge(edge_a), b.board_edge(edge_b)) {
                return Some((edge_a, edge_b));
            }
        }
    }
    None
}
