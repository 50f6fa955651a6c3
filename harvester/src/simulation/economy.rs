use macroquad::math::DVec2;
use rand::Rng;
use slotmap::SlotMap;
use tracing::{debug, warn};

use super::food::{Food, FoodKey, Nest};
use super::geometry::{Aabb, Arena, Collidable};
use crate::config::FoodConfig;

/// Replenishment schedule in whole ticks: first at `next_tick`, then every `every` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSchedule {
    pub next_tick: u64,
    pub every: u64,
}

impl DropSchedule {
    /// Converts the seconds-based schedule with the run's timestep.
    pub fn from_seconds(first_drop: f64, cadence: f64, dt: f64) -> Self {
        Self {
            next_tick: (first_drop / dt).round() as u64,
            every: ((cadence / dt).round() as u64).max(1),
        }
    }

    /// True once per scheduled drop; advances to the next drop when it fires.
    pub fn fire(&mut self, tick: u64) -> bool {
        if tick >= self.next_tick {
            self.next_tick += self.every;
            true
        } else {
            false
        }
    }
}

/// Result of one spawn batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOutcome {
    pub requested: u32,
    pub placed: u32,
}

impl SpawnOutcome {
    pub fn is_complete(&self) -> bool {
        self.placed == self.requested
    }
}

/// Food bookkeeping: the placed items and the units not yet delivered.
///
/// `available` counts every unit that has been placed and not yet delivered
/// to the nest, so an item being carried home still counts.
pub struct FoodEconomy {
    pub items: SlotMap<FoodKey, Food>,
    available: u64,
    spawned_total: u64,
    delivered_total: u64,
    picked_up_total: u64,
    food_size: f64,
    drop_amount: u32,
    placement_retries: u32,
    schedule: DropSchedule,
}

impl FoodEconomy {
    pub fn new(config: &FoodConfig, dt: f64) -> Self {
        Self {
            items: SlotMap::with_key(),
            available: 0,
            spawned_total: 0,
            delivered_total: 0,
            picked_up_total: 0,
            food_size: config.size,
            drop_amount: config.drop_amount,
            placement_retries: config.placement_retries,
            schedule: DropSchedule::from_seconds(config.first_drop, config.cadence, dt),
        }
    }

    pub fn available(&self) -> u64 {
        self.available
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn delivered_total(&self) -> u64 {
        self.delivered_total
    }

    pub fn picked_up_total(&self) -> u64 {
        self.picked_up_total
    }

    pub fn drop_amount(&self) -> u32 {
        self.drop_amount
    }

    /// Whether a scheduled batch is due this tick. Fires at most once per call.
    pub fn drop_due(&mut self, tick: u64) -> bool {
        self.schedule.fire(tick)
    }

    /// Places `batch_size` items at random free spots.
    ///
    /// Each item gets at most `placement_retries` attempts. When an item
    /// cannot be placed the rest of the batch is skipped.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        batch_size: u32,
        arena: &Arena,
        nest: &Nest,
        ant_bounds: &[Aabb],
        rng: &mut R,
    ) -> SpawnOutcome {
        let half = self.food_size / 2.0;
        let mut placed = 0;

        'batch: for _ in 0..batch_size {
            for _ in 0..self.placement_retries {
                let pos = DVec2::new(
                    rng.random_range(half..=arena.width - half),
                    rng.random_range(half..=arena.height - half),
                );
                if self.place_at(pos, nest, ant_bounds).is_some() {
                    placed += 1;
                    continue 'batch;
                }
            }
            warn!(
                requested = batch_size,
                placed,
                retries = self.placement_retries,
                "Food placement exhausted, skipping the rest of the batch"
            );
            break;
        }

        debug!(placed, available = self.available, "Food batch spawned");
        SpawnOutcome {
            requested: batch_size,
            placed,
        }
    }

    /// Places one item centred on `pos` if its footprint is free.
    pub fn place_at(&mut self, pos: DVec2, nest: &Nest, ant_bounds: &[Aabb]) -> Option<FoodKey> {
        let food = Food::new(pos, self.food_size);
        if !self.is_free(&food.bounds(), nest, ant_bounds) {
            return None;
        }
        self.available += 1;
        self.spawned_total += 1;
        Some(self.items.insert(food))
    }

    fn is_free(&self, candidate: &Aabb, nest: &Nest, ant_bounds: &[Aabb]) -> bool {
        !candidate.overlaps(&nest.bounds())
            && !self.items.values().any(|f| f.bounds().overlaps(candidate))
            && !ant_bounds.iter().any(|b| b.overlaps(candidate))
    }

    /// First item in iteration order overlapping `bounds`, skipping already claimed keys.
    pub fn first_overlapping(&self, bounds: &Aabb, claimed: &[FoodKey]) -> Option<FoodKey> {
        self.items
            .iter()
            .find(|(key, food)| !claimed.contains(key) && food.bounds().overlaps(bounds))
            .map(|(key, _)| key)
    }

    /// Removes a claimed item from the arena. The unit stays available until delivered.
    pub fn collect(&mut self, key: FoodKey) -> Option<Food> {
        let food = self.items.remove(key)?;
        self.picked_up_total += 1;
        Some(food)
    }

    /// Takes `n` delivered units out of the supply, never below zero.
    pub fn deplete(&mut self, n: u64) {
        debug_assert!(
            n <= self.available,
            "delivering {} units with only {} available",
            n,
            self.available
        );
        let taken = n.min(self.available);
        self.available -= taken;
        self.delivered_total += taken;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn economy(retries: u32) -> FoodEconomy {
        let config = FoodConfig {
            size: 20.0,
            first_drop: 0.0,
            cadence: 30.0,
            drop_amount: 10,
            placement_retries: retries,
        };
        FoodEconomy::new(&config, 0.05)
    }

    fn nest() -> Nest {
        Nest::new(DVec2::new(400.0, 300.0), 40.0)
    }

    #[test]
    fn spawned_items_never_overlap() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let arena = Arena::new(800.0, 600.0);
        let ants = vec![Aabb::from_center(DVec2::new(100.0, 100.0), 10.0)];
        let mut economy = economy(1000);

        let outcome = economy.spawn(50, &arena, &nest(), &ants, &mut rng);
        assert!(outcome.is_complete());
        assert_eq!(economy.available(), 50);
        assert_eq!(economy.items.len(), 50);

        let boxes: Vec<Aabb> = economy.items.values().map(|f| f.bounds()).collect();
        for (i, a) in boxes.iter().enumerate() {
            assert!(a.is_inside(&arena.bounds()));
            assert!(!a.overlaps(&nest().bounds()));
            assert!(!a.overlaps(&ants[0]));
            for b in &boxes[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn exhausted_placement_reports_partial_batch() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let arena = Arena::new(100.0, 100.0);
        let nest = Nest::new(DVec2::new(50.0, 50.0), 40.0);
        // one ant covering the whole arena leaves no free spot
        let ants = vec![Aabb::from_center(DVec2::new(50.0, 50.0), 100.0)];
        let mut economy = economy(25);

        let outcome = economy.spawn(5, &arena, &nest, &ants, &mut rng);
        assert_eq!(outcome, SpawnOutcome { requested: 5, placed: 0 });
        assert!(!outcome.is_complete());
        assert_eq!(economy.available(), 0);
    }

    #[test]
    fn collect_then_deplete_keeps_conservation() {
        let mut economy = economy(10);
        let key = economy
            .place_at(DVec2::new(430.0, 300.0), &nest(), &[])
            .expect("free spot");
        assert_eq!(economy.available(), 1);

        assert!(economy.collect(key).is_some());
        assert!(economy.collect(key).is_none());
        assert_eq!(economy.available(), 1);
        assert_eq!(economy.picked_up_total(), 1);

        economy.deplete(1);
        assert_eq!(economy.available(), 0);
        assert_eq!(
            economy.available(),
            economy.spawned_total() - economy.delivered_total()
        );
    }

    #[test]
    fn place_at_rejects_nest_overlap() {
        let mut economy = economy(10);
        assert!(economy.place_at(DVec2::new(410.0, 300.0), &nest(), &[]).is_none());
        assert_eq!(economy.available(), 0);
    }

    #[test]
    fn first_overlapping_skips_claimed() {
        let mut economy = economy(10);
        let a = economy.place_at(DVec2::new(100.0, 100.0), &nest(), &[]).unwrap();
        let b = economy.place_at(DVec2::new(125.0, 100.0), &nest(), &[]).unwrap();
        let probe = Aabb::from_center(DVec2::new(112.5, 100.0), 10.0);

        assert_eq!(economy.first_overlapping(&probe, &[]), Some(a));
        assert_eq!(economy.first_overlapping(&probe, &[a]), Some(b));
        assert_eq!(economy.first_overlapping(&probe, &[a, b]), None);
    }

    #[test]
    fn schedule_fires_on_first_drop_then_cadence() {
        let mut schedule = DropSchedule::from_seconds(1.0, 2.0, 0.5);
        let fired: Vec<u64> = (0..12).filter(|&t| schedule.fire(t)).collect();
        assert_eq!(fired, vec![2, 6, 10]);
    }
}
