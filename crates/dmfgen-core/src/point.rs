use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D coordinate in millimeters.
///
/// Whether a point is in board-global or some local frame depends on
/// context; APIs taking or returning points document which frame applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the cross product of two vectors.
    #[must_use]
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (*self - other).norm()
    }

    /// Rotate this point by `angle_deg` counter-clockwise around `origin`.
    #[must_use]
    pub fn rotated(&self, angle_deg: f64, origin: Point) -> Point {
        let v = rotate_vec(*self - origin, angle_deg);
        v + origin
    }

    /// Left-hand perpendicular, i.e. this vector rotated 90° CCW.
    #[must_use]
    pub fn perp(&self) -> Point {
        Point::new(-self.y, self.x)
    }
}

pub fn rotate_vec(v: Point, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    let (s, c) = a.sin_cos();
    Point::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}
