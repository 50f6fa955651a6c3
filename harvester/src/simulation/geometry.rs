//! Axis-aligned collision primitives shared by every entity in the arena.

use macroquad::math::DVec2;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Square box of side `size` centred on `center`.
    pub fn from_center(center: DVec2, size: f64) -> Self {
        let half = DVec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    #[inline(always)]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// True when `self` lies entirely within `outer`, edges included.
    pub fn is_inside(&self, outer: &Aabb) -> bool {
        self.min.x >= outer.min.x
            && self.min.y >= outer.min.y
            && self.max.x <= outer.max.x
            && self.max.y <= outer.max.y
    }
}

/// The rectangle `[0, width] × [0, height]` ant centres are confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline(always)]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            min: DVec2::ZERO,
            max: DVec2::new(self.width, self.height),
        }
    }
}

/// Anything with a footprint that takes part in overlap tests.
pub trait Collidable {
    fn bounds(&self) -> Aabb;

    fn collides_with(&self, other: &dyn Collidable) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Anything that moves through the arena.
pub trait Movable {
    fn position(&self) -> DVec2;
}

impl Collidable for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::from_center(DVec2::new(400.0, 300.0), 40.0);
        let b = Aabb::from_center(DVec2::new(430.0, 300.0), 20.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Aabb::from_center(DVec2::new(10.0, 10.0), 10.0);
        let b = Aabb::from_center(DVec2::new(14.0, 17.0), 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(a.collides_with(&b));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = Aabb::from_center(DVec2::new(0.0, 0.0), 100.0);
        let inner = Aabb::from_center(DVec2::new(5.0, -5.0), 2.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.is_inside(&outer));
        assert!(!outer.is_inside(&inner));
    }

    #[test]
    fn arena_contains_edges() {
        let arena = Arena::new(800.0, 600.0);
        assert!(arena.contains(DVec2::new(0.0, 0.0)));
        assert!(arena.contains(DVec2::new(800.0, 600.0)));
        assert!(!arena.contains(DVec2::new(800.1, 10.0)));
        assert!(!arena.contains(DVec2::new(10.0, -0.1)));
    }
}
