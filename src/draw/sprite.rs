//! Collision bookkeeping for dots that must not overlap.
//!
//! Placed circles are bucketed in a uniform grid so a candidate only has
//! to be checked against its neighbourhood, which keeps packing tens of
//! thousands of dots cheap.

use super::Point;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True when the circles overlap or touch.
    pub fn collides(&self, other: &Circle) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }
}

#[derive(Debug, Clone)]
pub struct SpriteField {
    cell: f64,
    circles: Vec<Circle>,
    grid: HashMap<(i64, i64), Vec<usize>>,
    max_radius: f64,
}

impl Default for SpriteField {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl SpriteField {
    /// A field bucketed into square cells of side `cell` (user units).
    pub fn new(cell: f64) -> Self {
        let cell = if cell > 0.0 && cell.is_finite() { cell } else { 0.05 };
        Self {
            cell,
            circles: Vec::new(),
            grid: HashMap::new(),
            max_radius: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn clear(&mut self) {
        self.circles.clear();
        self.grid.clear();
        self.max_radius = 0.0;
    }

    fn key(&self, p: Point) -> (i64, i64) {
        ((p.x / self.cell).floor() as i64, (p.y / self.cell).floor() as i64)
    }

    /// Whether `circle` would touch anything already placed.
    pub fn collides(&self, circle: &Circle) -> bool {
        let reach = circle.radius + self.max_radius;
        let (x0, y0) = self.key(circle.center - Point::new(reach, reach));
        let (x1, y1) = self.key(circle.center + Point::new(reach, reach));
        for gx in x0..=x1 {
            for gy in y0..=y1 {
                let Some(bucket) = self.grid.get(&(gx, gy)) else {
                    continue;
                };
                if bucket.iter().any(|&i| self.circles[i].collides(circle)) {
                    return true;
                }
            }
        }
        false
    }

    /// Record `circle` without checking for collisions.
    pub fn insert(&mut self, circle: Circle) {
        let index = self.circles.len();
        let key = self.key(circle.center);
        self.grid.entry(key).or_default().push(index);
        self.max_radius = self.max_radius.max(circle.radius);
        self.circles.push(circle);
    }

    /// Place `circle` if it is clear of every placed circle.
    pub fn try_place(&mut self, circle: Circle) -> bool {
        if self.collides(&circle) {
            return false;
        }
        self.insert(circle);
        true
    }

    /// Place every circle in `group`, or none of them if any would collide
    /// with the field. Members of the group are not checked against each other.
    pub fn try_place_all(&mut self, group: &[Circle]) -> bool {
        if group.iter().any(|c| self.collides(c)) {
            return false;
        }
        for &c in group {
            self.insert(c);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64, r: f64) -> Circle {
        Circle::new(Point::new(x, y), r)
    }

    #[test]
    fn touching_counts_as_collision() {
        assert!(c(0.0, 0.0, 0.5).collides(&c(1.0, 0.0, 0.5)));
        assert!(!c(0.0, 0.0, 0.5).collides(&c(1.01, 0.0, 0.5)));
    }

    #[test]
    fn rejects_overlap_accepts_clear() {
        let mut field = SpriteField::new(0.1);
        assert!(field.try_place(c(0.0, 0.0, 0.125)));
        assert!(!field.try_place(c(0.1, 0.1, 0.05)));
        assert!(field.try_place(c(0.5, 0.5, 0.05)));
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn large_circles_are_found_from_distant_cells() {
        let mut field = SpriteField::new(0.01);
        field.insert(c(0.0, 0.0, 0.4));
        // centre is 40 cells away but inside the big circle's reach
        assert!(field.collides(&c(0.42, 0.0, 0.03)));
        assert!(!field.collides(&c(0.5, 0.0, 0.05)));
    }

    #[test]
    fn group_placement_is_all_or_nothing() {
        let mut field = SpriteField::default();
        field.insert(c(-0.5, 0.5, 0.1));
        let group = Point::new(0.5, 0.5).mirrors().map(|p| Circle::new(p, 0.1));
        assert!(!field.try_place_all(&group));
        assert_eq!(field.len(), 1);
        field.clear();
        assert!(field.try_place_all(&group));
        assert_eq!(field.len(), 4);
    }

    #[test]
    fn matches_brute_force() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);
        let mut field = SpriteField::new(0.07);
        let mut placed: Vec<Circle> = Vec::new();
        for _ in 0..400 {
            let cand = c(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(0.005..0.08),
            );
            let expected = !placed.iter().any(|p| p.collides(&cand));
            assert_eq!(field.try_place(cand), expected);
            if expected {
                placed.push(cand);
            }
        }
    }
}
