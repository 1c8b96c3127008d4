//! Drawing toolkit shared by the sketches.

pub mod brush;
pub mod canvas;
pub mod color;
pub mod sprite;

pub use brush::{BasicBrush, Brush, FramedBrush, ImageBrush};
pub use canvas::Canvas;
pub use color::{palette, Rgba};
pub use sprite::{Circle, SpriteField};

use std::ops::{Add, Mul, Sub};

/// A point or offset in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// The point and its reflections across both axes.
    pub fn mirrors(&self) -> [Point; 4] {
        [
            *self,
            Point::new(-self.x, self.y),
            Point::new(self.x, -self.y),
            Point::new(-self.x, -self.y),
        ]
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.length(), 5.0);
        assert_eq!(p - Point::new(3.0, 0.0), Point::new(0.0, 4.0));
        assert_eq!(p * 2.0, Point::new(6.0, 8.0));
        assert_eq!(p.distance(Point::ORIGIN), 5.0);
    }

    #[test]
    fn mirrors_cover_all_quadrants() {
        let m = Point::new(0.5, -0.25).mirrors();
        assert_eq!(m[1], Point::new(-0.5, -0.25));
        assert_eq!(m[2], Point::new(0.5, 0.25));
        assert_eq!(m[3], Point::new(-0.5, 0.25));
    }
}
