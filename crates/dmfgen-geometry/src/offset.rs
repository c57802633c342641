use dmfgen_core::Point;

use crate::polygon::Polygon;
use crate::segment::line_intersection;

const SIMPLE_EPS: f64 = 1e-9;

/// Adjacent edge directions with a cross product below this are treated
/// as parallel and keep the shared offset endpoint instead of a miter.
const PARALLEL_EPS: f64 = 1e-12;

#[derive(Debug, thiserror::Error)]
pub enum OffsetError {
    #[error("inset by {distance} produces degenerate geometry: {detail}")]
    DegenerateOffset { distance: f64, detail: &'static str },
}

/// Offset a polygon's boundary inward by `distance`, mitering corners.
///
/// Each edge moves along its inward normal; consecutive offset edge lines
/// are intersected to rebuild the corners. The result is validated: it
/// must stay simple, keep the original winding, and (for `distance > 0`)
/// have strictly smaller area. Anything else fails with
/// [`OffsetError::DegenerateOffset`] — in particular any `distance` at or
/// beyond half the polygon's minimum local width.
pub fn inset(polygon: &Polygon, distance: f64) -> Result<Polygon, OffsetError> {
    let fail = |detail: &'static str| OffsetError::DegenerateOffset { distance, detail };

    if !distance.is_finite() || distance < 0.0 {
        return Err(fail("distance must be finite and non-negative"));
    }
    if distance == 0.0 {
        return Ok(polygon.clone());
    }

    let n = polygon.len();
    let mut raw: Vec<Point> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = polygon.point((i + n - 1) % n);
        let here = polygon.point(i);
        let next = polygon.point((i + 1) % n);

        let dir_in = unit(here - prev);
        let dir_out = unit(next - here);

        // Interior lies to the left of each directed edge of a CCW loop.
        let line_in = here + dir_in.perp() * distance;
        let line_out = here + dir_out.perp() * distance;

        let cross = dir_in.cross(dir_out);
        let vertex = if cross.abs() < PARALLEL_EPS {
            if dir_in.dot(dir_out) > 0.0 {
                line_out
            } else {
                return Err(fail("spike vertex has no inward miter"));
            }
        } else {
            match line_intersection(line_in, dir_in, line_out, dir_out) {
                Some(p) => p,
                None => return Err(fail("offset edge lines do not meet")),
            }
        };
        raw.push(vertex);
    }

    // Winding must be checked on the raw loop: an over-deep inset turns
    // the boundary inside out, and `Polygon::new` would silently flip it
    // back to CCW.
    if signed_area(&raw) <= 0.0 {
        return Err(fail("boundary turned inside out"));
    }
    let result = Polygon::new(raw).map_err(|_| fail("boundary collapsed"))?;
    if result.area() >= polygon.area() {
        return Err(fail("area did not shrink"));
    }
    if !result.is_simple(SIMPLE_EPS) {
        return Err(fail("result is self-intersecting"));
    }
    Ok(result)
}

fn unit(v: Point) -> Point {
    v * (1.0 / v.norm())
}

fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    acc / 2.0
}
