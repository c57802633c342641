use serde::{Deserialize, Serialize};

use crate::point::{rotate_vec, Point};

/// A local → board transform: rotation (degrees, CCW) about the local
/// origin, followed by translation to `origin`.
///
/// Electrodes carry their frame by value, so a polygon stored in local
/// coordinates can be mapped to board coordinates (and back) without any
/// reference to its container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub origin: Point,
    pub rotation_deg: f64,
}

impl Frame {
    #[must_use]
    pub fn new(origin: Point, rotation_deg: f64) -> Self {
        Self {
            origin,
            rotation_deg,
        }
    }

    #[must_use]
    pub fn translation(origin: Point) -> Self {
        Self::new(origin, 0.0)
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point::default(), 0.0)
    }

    /// Map a local-frame point to board coordinates.
    #[must_use]
    pub fn to_board(&self, p: Point) -> Point {
        rotate_vec(p, self.rotation_deg) + self.origin
    }

    /// Map a board-coordinate point back into this frame. Exact inverse of
    /// [`Frame::to_board`].
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        rotate_vec(p - self.origin, -self.rotation_deg)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn to_board_rotates_then_translates() {
        let f = Frame::new(Point::new(10.0, 5.0), 90.0);
        let p = f.to_board(Point::new(1.0, 0.0));
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn to_local_inverts_to_board() {
        let f = Frame::new(Point::new(-3.0, 7.5), 33.0);
        let p = Point::new(1.25, -4.0);
        let back = f.to_local(f.to_board(p));
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
    }

    #[test]
    fn translation_frame_leaves_rotation_zero() {
        let f = Frame::translation(Point::new(2.0, 3.0));
        let p = f.to_board(Point::new(1.0, 1.0));
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 4.0, epsilon = 1e-12);
    }
}
