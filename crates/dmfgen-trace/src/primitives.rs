use dmfgen_core::Point;
use serde::{Deserialize, Serialize};

/// A straight segment between two endpoints, in the drawing's local frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

/// A circular arc swept CCW from `start_angle_deg` to `end_angle_deg`
/// (negative sweeps run CW).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
}

/// One curve primitive as handed over by the external CAD-file parser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line(Line),
    Arc(Arc),
}

impl Arc {
    /// Tessellate into a polyline at roughly `step_deg` per segment,
    /// endpoints included.
    #[must_use]
    pub fn points(&self, step_deg: f64) -> Vec<Point> {
        let sweep = self.end_angle_deg - self.start_angle_deg;
        let steps = ((sweep.abs() / step_deg).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| {
                let angle = self.start_angle_deg + sweep * (i as f64 / steps as f64);
                let (s, c) = angle.to_radians().sin_cos();
                Point::new(self.center.x + self.radius * c, self.center.y + self.radius * s)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arc_tessellation_includes_both_endpoints() {
        let arc = Arc {
            center: Point::new(0.0, 0.0),
            radius: 1.0,
            start_angle_deg: 0.0,
            end_angle_deg: 90.0,
        };
        let pts = arc.points(20.0);
        let first = pts.first().unwrap();
        let last = pts.last().unwrap();
        assert_abs_diff_eq!(first.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last.y, 1.0, epsilon = 1e-9);
        assert!(pts.len() >= 5);
    }

    #[test]
    fn tiny_arc_still_produces_one_segment() {
        let arc = Arc {
            center: Point::new(0.0, 0.0),
            radius: 10.0,
            start_angle_deg: 0.0,
            end_angle_deg: 5.0,
        };
        assert_eq!(arc.points(20.0).len(), 2);
    }

    #[test]
    fn negative_sweep_runs_clockwise() {
        let arc = Arc {
            center: Point::new(0.0, 0.0),
            radius: 1.0,
            start_angle_deg: 90.0,
            end_angle_deg: 0.0,
        };
        let pts = arc.points(30.0);
        assert_abs_diff_eq!(pts.first().unwrap().y, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pts.last().unwrap().x, 1.0, epsilon = 1e-9);
    }
}
