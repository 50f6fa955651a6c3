use macroquad::math::DVec2;
use rand::Rng;
use shared::util::{heading_towards, wrap_angle};
use shared::{EntityKind, EntitySnapshot};
use slotmap::new_key_type;
use std::f64::consts::TAU;

use super::food::Nest;
use super::geometry::{Aabb, Arena, Collidable, Movable};

new_key_type! {
    /// Key for ant slotmap.
    pub struct AntKey;
}

/// Foraging state of an ant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntState {
    AtNest,
    ForagingOutbound,
    ReturningWithFood,
    ReturningEmpty,
}

impl AntState {
    pub fn is_returning(self) -> bool {
        matches!(
            self,
            AntState::ReturningWithFood | AntState::ReturningEmpty
        )
    }
}

/// What happens to an ant that is checked against the nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestOutcome {
    /// Not at the nest, or not allowed to end its trip yet.
    Stay,
    /// Brought food home: counts as an arrival.
    Delivered,
    /// Came home without food: removed silently.
    ReturnedEmpty,
}

/// State of an ant.
#[derive(Debug, Clone, PartialEq)]
pub struct Ant {
    pub pos: DVec2,
    pub heading: f64,
    pub state: AntState,
    pub size: f64,
    /// Set the first tick the ant's footprint no longer overlaps the nest.
    pub has_left_nest: bool,
    pub ticks_searching: u64,
}

impl Ant {
    /// Create an ant sitting at `pos`. It does not forage until [`Ant::depart`].
    pub fn new(pos: DVec2, heading: f64, size: f64) -> Self {
        Self {
            pos,
            heading: wrap_angle(heading),
            state: AntState::AtNest,
            size,
            has_left_nest: false,
            ticks_searching: 0,
        }
    }

    /// A fresh forager leaving from the nest centre in a uniformly random direction.
    pub fn spawn_at<R: Rng + ?Sized>(nest: &Nest, size: f64, rng: &mut R) -> Self {
        let mut ant = Self::new(nest.pos, rng.random_range(0.0..TAU), size);
        ant.depart();
        ant
    }

    pub fn depart(&mut self) {
        if self.state == AntState::AtNest {
            self.state = AntState::ForagingOutbound;
        }
    }

    pub fn update_left_nest(&mut self, nest: &Nest) {
        if !self.has_left_nest && !self.collides_with(nest) {
            self.has_left_nest = true;
        }
    }

    /// Decides whether this ant's trip ends at the nest this tick.
    pub fn nest_outcome(&self, nest: &Nest) -> NestOutcome {
        if !self.collides_with(nest) {
            return NestOutcome::Stay;
        }
        match self.state {
            AntState::ReturningWithFood => NestOutcome::Delivered,
            AntState::ReturningEmpty => NestOutcome::ReturnedEmpty,
            AntState::ForagingOutbound if self.has_left_nest => NestOutcome::ReturnedEmpty,
            _ => NestOutcome::Stay,
        }
    }

    /// Moves the ant one tick and returns the distance covered.
    ///
    /// Outbound ants jitter their heading first. A move that would put the
    /// centre outside the arena is rejected: the ant stays put and draws a
    /// new uniformly random heading.
    ///
    /// Returning ants face the nest centre every tick and stop on it when
    /// it is closer than one step, so a long stride cannot carry them past.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        arena: &Arena,
        nest: &Nest,
        speed: f64,
        jitter: f64,
        rng: &mut R,
    ) -> f64 {
        match self.state {
            AntState::AtNest => return 0.0,
            AntState::ForagingOutbound => {
                self.ticks_searching += 1;
                if jitter > 0.0 {
                    self.heading =
                        wrap_angle(self.heading + rng.random_range(-jitter..=jitter));
                }
            }
            _ => {}
        }

        if self.state.is_returning() {
            self.face(nest);
            let remaining = self.pos.distance(nest.pos);
            if remaining <= speed {
                self.pos = nest.pos;
                return remaining;
            }
        }

        let (sin, cos) = self.heading.sin_cos();
        let next = self.pos + DVec2::new(cos, sin) * speed;

        if arena.contains(next) {
            let distance = next.distance(self.pos);
            self.pos = next;
            distance
        } else {
            if self.state == AntState::ForagingOutbound {
                self.heading = rng.random_range(0.0..TAU);
            }
            0.0
        }
    }

    /// Outbound → returning with food, facing the nest.
    pub fn pick_up_food(&mut self, nest: &Nest) {
        self.state = AntState::ReturningWithFood;
        self.face(nest);
    }

    /// Outbound → returning empty after searching too long.
    pub fn give_up(&mut self, nest: &Nest) {
        self.state = AntState::ReturningEmpty;
        self.face(nest);
    }

    fn face(&mut self, nest: &Nest) {
        self.heading = wrap_angle(heading_towards(
            (self.pos.x, self.pos.y),
            (nest.pos.x, nest.pos.y),
        ));
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        let kind = match self.state {
            AntState::AtNest => EntityKind::AntAtNest,
            AntState::ForagingOutbound => EntityKind::AntOutbound,
            AntState::ReturningWithFood => EntityKind::AntReturningWithFood,
            AntState::ReturningEmpty => EntityKind::AntReturningEmpty,
        };
        EntitySnapshot {
            kind,
            x: self.pos.x,
            y: self.pos.y,
            heading: self.heading,
            size: self.size,
        }
    }
}

impl Collidable for Ant {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

impl Movable for Ant {
    fn position(&self) -> DVec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::PI;

    fn nest() -> Nest {
        Nest::new(DVec2::new(400.0, 300.0), 40.0)
    }

    #[test]
    fn spawned_ant_is_outbound_at_nest_centre() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ant = Ant::spawn_at(&nest(), 10.0, &mut rng);
        assert_eq!(ant.state, AntState::ForagingOutbound);
        assert_eq!(ant.pos, nest().pos);
        assert!((0.0..TAU).contains(&ant.heading));
        assert!(!ant.has_left_nest);
    }

    #[test]
    fn straight_move_without_jitter() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let arena = Arena::new(800.0, 600.0);
        let mut ant = Ant::new(DVec2::new(100.0, 100.0), 0.0, 10.0);
        ant.depart();
        let distance = ant.step(&arena, &nest(), 5.0, 0.0, &mut rng);
        assert!((distance - 5.0).abs() < 1e-12);
        assert!((ant.pos.x - 105.0).abs() < 1e-12);
        assert!((ant.pos.y - 100.0).abs() < 1e-12);
        assert_eq!(ant.heading, 0.0);
    }

    #[test]
    fn rejected_move_keeps_position_and_rerolls_heading() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let arena = Arena::new(800.0, 600.0);
        let start = DVec2::new(798.0, 300.0);
        let mut ant = Ant::new(start, 0.0, 10.0);
        ant.depart();
        let distance = ant.step(&arena, &nest(), 5.0, 0.0, &mut rng);
        assert_eq!(distance, 0.0);
        assert_eq!(ant.pos, start);
        assert_ne!(ant.heading, 0.0);
    }

    #[test]
    fn random_walk_stays_inside_arena() {
        let arena = Arena::new(200.0, 100.0);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut ant = Ant::new(DVec2::new(100.0, 50.0), 0.0, 10.0);
            ant.depart();
            for _ in 0..2000 {
                let before = ant.pos;
                let distance = ant.step(&arena, &nest(), 7.5, 0.3, &mut rng);
                assert!(arena.contains(ant.pos), "seed {} left arena at {:?}", seed, ant.pos);
                if distance == 0.0 {
                    assert_eq!(ant.pos, before);
                }
            }
        }
    }

    #[test]
    fn pick_up_points_home_and_stops_jitter() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let arena = Arena::new(800.0, 600.0);
        let mut ant = Ant::new(DVec2::new(430.0, 300.0), 0.3, 10.0);
        ant.depart();
        ant.pick_up_food(&nest());
        assert_eq!(ant.state, AntState::ReturningWithFood);
        assert!((ant.heading - PI).abs() < 1e-12);

        ant.step(&arena, &nest(), 5.0, 1.0, &mut rng);
        assert!((ant.heading - PI).abs() < 1e-12);
        assert!((ant.pos.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn outbound_ant_only_ends_trip_after_leaving_nest() {
        let nest = nest();
        let mut ant = Ant::new(nest.pos, 0.0, 10.0);
        ant.depart();
        ant.update_left_nest(&nest);
        assert_eq!(ant.nest_outcome(&nest), NestOutcome::Stay);

        ant.pos = DVec2::new(500.0, 300.0);
        ant.update_left_nest(&nest);
        assert!(ant.has_left_nest);

        ant.pos = nest.pos;
        assert_eq!(ant.nest_outcome(&nest), NestOutcome::ReturnedEmpty);
    }

    #[test]
    fn returning_ant_outcomes() {
        let nest = nest();
        let mut ant = Ant::new(nest.pos, 0.0, 10.0);
        ant.state = AntState::ReturningWithFood;
        assert_eq!(ant.nest_outcome(&nest), NestOutcome::Delivered);
        ant.state = AntState::ReturningEmpty;
        assert_eq!(ant.nest_outcome(&nest), NestOutcome::ReturnedEmpty);
        ant.pos = DVec2::new(10.0, 10.0);
        assert_eq!(ant.nest_outcome(&nest), NestOutcome::Stay);
    }

    #[test]
    fn fast_returning_ant_stops_on_the_nest() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let arena = Arena::new(800.0, 600.0);
        let mut ant = Ant::new(DVec2::new(426.0, 300.0), PI, 10.0);
        ant.state = AntState::ReturningWithFood;

        let distance = ant.step(&arena, &nest(), 60.0, 0.0, &mut rng);
        assert!((distance - 26.0).abs() < 1e-12);
        assert_eq!(ant.pos, nest().pos);
        assert_eq!(ant.nest_outcome(&nest()), NestOutcome::Delivered);
    }

    #[test]
    fn returning_ant_turns_back_to_the_nest() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let arena = Arena::new(800.0, 600.0);
        let mut ant = Ant::new(DVec2::new(400.0, 100.0), 0.0, 10.0);
        ant.state = AntState::ReturningEmpty;

        ant.step(&arena, &nest(), 5.0, 0.0, &mut rng);
        assert!((ant.heading - PI / 2.0).abs() < 1e-12);
        assert!((ant.pos.x - 400.0).abs() < 1e-9);
        assert!((ant.pos.y - 105.0).abs() < 1e-9);
    }
}
