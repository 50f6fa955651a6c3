use macroquad::math::DVec2;
use slotmap::new_key_type;

use super::geometry::{Aabb, Collidable};

new_key_type! {
    /// Key for the food slotmap.
    pub struct FoodKey;
}

/// One collectible food unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub pos: DVec2,
    pub size: f64,
}

impl Food {
    pub fn new(pos: DVec2, size: f64) -> Self {
        Self { pos, size }
    }
}

impl Collidable for Food {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// The colony's nest: origin of every ant and the delivery point. Fixed for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Nest {
    pub pos: DVec2,
    pub size: f64,
}

impl Nest {
    pub fn new(pos: DVec2, size: f64) -> Self {
        Self { pos, size }
    }
}

impl Collidable for Nest {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}
