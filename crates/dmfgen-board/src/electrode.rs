use dmfgen_core::{Frame, Point};
use dmfgen_geometry::Polygon;

/// A single conductive pad: a simple polygon in its own local frame plus
/// identity and placement.
///
/// The polygon is the design-of-record and is mutated in place by
/// crenellation; the clearance-inset copy produced at export time is
/// derived, never written back.
#[derive(Debug, Clone)]
pub struct Electrode {
    /// Unique board-wide reference identifier, assigned by the
    /// [`Constructor`](crate::Constructor); designator form is `E{refdes}`.
    pub refdes: u32,
    /// Peripheral electrodes carry their definition label; grid electrodes
    /// carry none.
    pub label: Option<String>,
    /// Outline in the electrode's local frame.
    pub polygon: Polygon,
    /// Local → board transform.
    pub frame: Frame,
    /// Footprint pad anchor, local frame.
    pub anchor: Point,
}

impl Electrode {
    #[must_use]
    pub fn designator(&self) -> String {
        format!("E{}", self.refdes)
    }

    /// Outline in board coordinates.
    #[must_use]
    pub fn board_polygon(&self) -> Polygon {
        self.polygon.map(|p| self.frame.to_board(p))
    }

    /// Start and end of the nth edge, board coordinates.
    #[must_use]
    pub fn board_edge(&self, n: usize) -> (Point, Point) {
        let (a, b) = self.polygon.edge(n);
        (self.frame.to_board(a), self.frame.to_board(b))
    }

    #[must_use]
    pub fn board_anchor(&self) -> Point {
        self.frame.to_board(self.anchor)
    }

    /// Insert a run of board-coordinate vertices before vertex `index`,
    /// mapping them into the local frame first. Endpoints duplicating the
    /// neighboring vertices are pruned (see [`Polygon::insert_run`]).
    pub fn insert_board_points(&mut self, index: usize, run: &[Point]) {
        let local: Vec<Point> = run.iter().map(|&p| self.frame.to_local(p)).collect();
        self.polygon.insert_run(index, &local);
    }
}
