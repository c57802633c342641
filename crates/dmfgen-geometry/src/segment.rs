use dmfgen_core::Point;

/// Cross products this small count as collinear in the overlap test.
const COLLINEAR_EPS: f64 = 1e-8;

/// Slack on the projected containment interval.
const CONTAIN_TOL: f64 = 1e-12;

/// True when the two segments are collinear and one is contained
/// completely within the other (a shared endpoint interval counts).
///
/// Partial overlap does not count: electrodes abut along whole edges, so
/// the shared run between two polygons is always one edge contained in
/// the other.
#[must_use]
pub fn segments_overlap(a: (Point, Point), b: (Point, Point)) -> bool {
    let xp0 = (b.0 - a.0).cross(b.0 - a.1);
    let xp1 = (b.1 - a.0).cross(b.1 - a.1);
    if xp0.abs() > COLLINEAR_EPS || xp1.abs() > COLLINEAR_EPS {
        return false;
    }

    let len_a = (a.1 - a.0).norm();
    if len_a < CONTAIN_TOL {
        return false;
    }
    let u = (a.1 - a.0) * (1.0 / len_a);
    let d0 = (b.0 - a.0).dot(u);
    let d1 = (b.1 - a.0).dot(u);

    let inside = |d: f64| d >= -CONTAIN_TOL && d <= len_a + CONTAIN_TOL;
    (inside(d0) && inside(d1)) || (d0 <= 0.0 && d1 >= len_a) || (d0 >= len_a && d1 <= 0.0)
}

/// True when the segments share any point, within `eps`.
#[must_use]
pub fn segments_intersect(a: (Point, Point), b: (Point, Point), eps: f64) -> bool {
    let o1 = orient(a.0, a.1, b.0);
    let o2 = orient(a.0, a.1, b.1);
    let o3 = orient(b.0, b.1, a.0);
    let o4 = orient(b.0, b.1, a.1);

    if (o1 > eps && o2 < -eps || o1 < -eps && o2 > eps)
        && (o3 > eps && o4 < -eps || o3 < -eps && o4 > eps)
    {
        return true;
    }

    (o1.abs() <= eps && on_segment(a.0, a.1, b.0, eps))
        || (o2.abs() <= eps && on_segment(a.0, a.1, b.1, eps))
        || (o3.abs() <= eps && on_segment(b.0, b.1, a.0, eps))
        || (o4.abs() <= eps && on_segment(b.0, b.1, a.1, eps))
}

/// Intersection of the infinite lines through `p` (direction `d`) and `q`
/// (direction `e`); `None` when the lines are parallel.
#[must_use]
pub fn line_intersection(p: Point, d: Point, q: Point, e: Point) -> Option<Point> {
    let denom = d.cross(e);
    if denom.abs() < CONTAIN_TOL {
        return None;
    }
    let t = (q - p).cross(e) / denom;
    Some(p + d * t)
}

fn orient(p: Point, q: Point, r: Point) -> f64 {
    (q - p).cross(r - p)
}

/// Assumes `r` is collinear with `p -> q`; true when it lies within the
/// segment's bounding interval.
fn on_segment(p: Point, q: Point, r: Point, eps: f64) -> bool {
    r.x >= p.x.min(q.x) - eps
        && r.x <= p.x.max(q.x) + eps
        && r.y >= p.y.min(q.y) - eps
        && r.y <= p.y.max(q.y) + eps
}
