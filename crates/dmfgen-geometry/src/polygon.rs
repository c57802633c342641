use dmfgen_core::Point;

/// Two consecutive vertices closer than this are collapsed into one at
/// construction time.
const VERTEX_EPS: f64 = 1e-9;

/// Tolerance used when pruning inserted run endpoints against existing
/// vertices (matches the coarseness of hand-drawn CAD input).
const INSERT_PRUNE_EPS: f64 = 1e-3;

#[derive(Debug, thiserror::Error)]
pub enum PolygonError {
    #[error("polygon needs at least 3 distinct vertices (got {count})")]
    TooFewVertices { count: usize },
    #[error("polygon vertices are collinear (zero area)")]
    ZeroArea,
}

/// A simple closed loop of ≥3 distinct vertices, wound counter-clockwise.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Construction normalizes winding and collapses repeated consecutive
/// vertices; mutation via [`Polygon::insert_run`] preserves both
/// properties for the well-formed inputs the crenellation engine produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Result<Self, PolygonError> {
        let mut pts = dedup_loop(points);
        if pts.len() < 3 {
            return Err(PolygonError::TooFewVertices { count: pts.len() });
        }
        let area = shoelace(&pts);
        if area.abs() < VERTEX_EPS {
            return Err(PolygonError::ZeroArea);
        }
        if area < 0.0 {
            pts.reverse();
        }
        Ok(Self { points: pts })
    }

    /// Axis-aligned CCW square with its corner at the local origin.
    #[must_use]
    pub fn square(side: f64) -> Self {
        Self {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(side, 0.0),
                Point::new(side, side),
                Point::new(0.0, side),
            ],
        }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn point(&self, n: usize) -> Point {
        self.points[n]
    }

    /// Start and end point of the nth edge; edge `len()-1` is the implicit
    /// closing edge back to vertex 0.
    #[must_use]
    pub fn edge(&self, n: usize) -> (Point, Point) {
        let next = (n + 1) % self.points.len();
        (self.points[n], self.points[next])
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.points.len()).map(move |i| self.edge(i))
    }

    #[must_use]
    pub fn signed_area(&self) -> f64 {
        shoelace(&self.points)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area-weighted centroid.
    #[must_use]
    pub fn centroid(&self) -> Point {
        let n = self.points.len();
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let w = p.cross(q);
            cx += (p.x + q.x) * w;
            cy += (p.y + q.y) * w;
        }
        let scale = 6.0 * self.signed_area();
        Point::new(cx / scale, cy / scale)
    }

    /// Apply a rigid (orientation-preserving) transform to every vertex.
    #[must_use]
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Polygon {
        Polygon {
            points: self.points.iter().copied().map(f).collect(),
        }
    }

    #[must_use]
    pub fn translated(&self, delta: Point) -> Polygon {
        self.map(|p| p + delta)
    }

    /// Insert a run of vertices before index `index` (so the run lands on
    /// the edge from vertex `index - 1` to vertex `index`; `index == len()`
    /// appends, with the neighbor wrapping to vertex 0).
    ///
    /// The first and last run points are dropped when they duplicate the
    /// neighboring existing vertex, so callers can pass a run that includes
    /// the edge endpoints without creating degenerate zero-length edges.
    pub fn insert_run(&mut self, index: usize, run: &[Point]) {
        if run.is_empty() {
            return;
        }
        let n = self.points.len();
        let prev = self.points[(index + n - 1) % n];
        let next = self.points[index % n];

        let mut start = 0;
        let mut end = run.len();
        if prev.distance_to(run[0]) < INSERT_PRUNE_EPS {
            start = 1;
        }
        if end > start && next.distance_to(run[end - 1]) < INSERT_PRUNE_EPS {
            end -= 1;
        }
        self.points.splice(index..index, run[start..end].iter().copied());
    }

    /// True when no two non-adjacent edges touch or cross.
    #[must_use]
    pub fn is_simple(&self, eps: f64) -> bool {
        let n = self.points.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    continue;
                }
                if crate::segment::segments_intersect(self.edge(i), self.edge(j), eps) {
                    return false;
                }
            }
        }
        true
    }
}

fn shoelace(points: &[Point]) -> f64 {
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    acc / 2.0
}

/// Collapse consecutive duplicates, including the wrap-around pair.
fn dedup_loop(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |last| last.distance_to(p) >= VERTEX_EPS) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].distance_to(out[out.len() - 1]) < VERTEX_EPS {
        out.pop();
    }
    out
}
