use macroquad::math::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shared::{EntityKind, EntitySnapshot, TickSample, WorldSnapshot};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::telemetry::{ForagingOutcome, RunHistory, RunReport, TelemetrySink};

use super::ant::{Ant, AntKey, AntState, NestOutcome};
use super::economy::{FoodEconomy, SpawnOutcome};
use super::food::{FoodKey, Nest};
use super::geometry::{Aabb, Arena, Collidable, Movable};
use super::recruitment::RecruitmentController;

/// The simulation clock. Owns every piece of mutable state and the only RNG.
pub struct Simulation {
    pub tick: u64,
    pub config: SimulationConfig,
    pub arena: Arena,
    pub nest: Nest,
    pub ants: SlotMap<AntKey, Ant>,
    pub economy: FoodEconomy,
    pub controller: RecruitmentController,
    pub history: RunHistory,
    rng: ChaCha8Rng,
    budget: u64,
    cumulative_arrivals: u64,
    cumulative_departures: u64,
    total_distance: f64,
    max_population: u64,
    supply_since: Option<f64>,
    depletion_times: Vec<f64>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let arena = Arena::new(config.arena.width, config.arena.height);
        let nest = Nest::new(
            DVec2::new(config.arena.nest_x, config.arena.nest_y),
            config.arena.nest_size,
        );
        let economy = FoodEconomy::new(&config.food, config.run.dt);
        let controller = RecruitmentController::new(config.recruitment);
        let budget = config.run.total_ticks();

        info!(
            seed = config.run.seed,
            ticks = budget,
            dt = config.run.dt,
            "Simulation created"
        );

        Ok(Self {
            tick: 0,
            arena,
            nest,
            ants: SlotMap::with_key(),
            economy,
            controller,
            history: RunHistory::default(),
            rng: ChaCha8Rng::seed_from_u64(config.run.seed),
            budget,
            cumulative_arrivals: 0,
            cumulative_departures: 0,
            total_distance: 0.0,
            max_population: 0,
            supply_since: None,
            depletion_times: Vec::new(),
            config,
        })
    }

    /// Simulated seconds at the start of the current tick.
    pub fn time(&self) -> f64 {
        self.tick as f64 * self.config.run.dt
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.budget
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Runs one tick in its fixed phase order and returns the committed sample.
    pub fn tick(&mut self) -> TickSample {
        self.update_left_nest();
        let arrivals = self.resolve_nest_arrivals();
        let departures = self.recruit(arrivals);
        self.move_ants();
        self.resolve_food_collisions();
        let sample = self.record(arrivals, departures);
        self.maybe_drop_food();
        self.check_invariants();
        self.tick += 1;
        sample
    }

    /// Runs until the budget is exhausted, handing every sample to `sink`.
    pub fn run(&mut self, sink: &mut dyn TelemetrySink) -> RunReport {
        self.run_until(sink, || false)
    }

    /// Like [`Simulation::run`], but `stop` is consulted between ticks.
    pub fn run_until(
        &mut self,
        sink: &mut dyn TelemetrySink,
        mut stop: impl FnMut() -> bool,
    ) -> RunReport {
        while !self.is_finished() {
            if stop() {
                info!(tick = self.tick, "Stop requested");
                break;
            }
            let sample = self.tick();
            sink.record(&sample);
        }
        self.report()
    }

    fn update_left_nest(&mut self) {
        for ant in self.ants.values_mut() {
            ant.update_left_nest(&self.nest);
        }
    }

    fn resolve_nest_arrivals(&mut self) -> u32 {
        let mut arrivals = 0;
        let mut ants_to_remove: Vec<AntKey> = Vec::new();

        for (key, ant) in self.ants.iter() {
            match ant.nest_outcome(&self.nest) {
                NestOutcome::Delivered => {
                    arrivals += 1;
                    ants_to_remove.push(key);
                }
                NestOutcome::ReturnedEmpty => ants_to_remove.push(key),
                NestOutcome::Stay => {}
            }
        }

        for key in ants_to_remove {
            self.ants.remove(key);
        }

        if arrivals > 0 {
            self.economy.deplete(arrivals as u64);
            self.cumulative_arrivals += arrivals as u64;
            if self.economy.available() == 0 {
                if let Some(since) = self.supply_since.take() {
                    let elapsed = self.time() - since;
                    debug!(tick = self.tick, elapsed, "Food supply fully collected");
                    self.depletion_times.push(elapsed);
                }
            }
        }
        arrivals
    }

    fn recruit(&mut self, arrivals: u32) -> u32 {
        let departures = self.controller.update(arrivals, &mut self.rng);
        for _ in 0..departures {
            let ant = Ant::spawn_at(&self.nest, self.config.ant.size, &mut self.rng);
            self.ants.insert(ant);
        }
        self.cumulative_departures += departures as u64;
        departures
    }

    fn move_ants(&mut self) {
        let ant_cfg = &self.config.ant;
        for ant in self.ants.values_mut() {
            if let Some(limit) = ant_cfg.max_search_ticks {
                if ant.state == AntState::ForagingOutbound && ant.ticks_searching >= limit {
                    ant.give_up(&self.nest);
                }
            }
            self.total_distance += ant.step(
                &self.arena,
                &self.nest,
                ant_cfg.speed,
                ant_cfg.jitter,
                &mut self.rng,
            );
        }
    }

    /// Each outbound ant claims at most one item; claimed items are removed after the scan.
    fn resolve_food_collisions(&mut self) {
        let mut claimed: Vec<FoodKey> = Vec::new();

        for ant in self.ants.values_mut() {
            if ant.state != AntState::ForagingOutbound {
                continue;
            }
            if let Some(food_key) = self.economy.first_overlapping(&ant.bounds(), &claimed) {
                claimed.push(food_key);
                ant.pick_up_food(&self.nest);
            }
        }

        for key in claimed {
            self.economy.collect(key);
        }
    }

    fn record(&mut self, arrivals: u32, departures: u32) -> TickSample {
        let population = self.ants.len() as u64;
        self.max_population = self.max_population.max(population);

        let sample = TickSample {
            tick: self.tick,
            time: self.time(),
            arrivals,
            departures,
            cumulative_arrivals: self.cumulative_arrivals,
            cumulative_departures: self.cumulative_departures,
            population,
            alpha: self.controller.alpha(),
            food_available: self.economy.available(),
            food_collected: self.economy.picked_up_total(),
        };
        self.history.push(&sample);
        sample
    }

    fn maybe_drop_food(&mut self) {
        if !self.economy.drop_due(self.tick) {
            return;
        }
        let amount = self.economy.drop_amount();
        if amount == 0 {
            return;
        }
        let outcome = self.spawn_food(amount);
        if !outcome.is_complete() {
            warn!(
                tick = self.tick,
                requested = outcome.requested,
                placed = outcome.placed,
                "Scheduled food drop only partially placed"
            );
        }
    }

    /// Places a batch of food at random free spots, outside the regular schedule.
    pub fn spawn_food(&mut self, amount: u32) -> SpawnOutcome {
        let ant_bounds = self.ant_bounds();
        let before = self.economy.available();
        let outcome = self.economy.spawn(
            amount,
            &self.arena,
            &self.nest,
            &ant_bounds,
            &mut self.rng,
        );
        self.note_supply(before);
        outcome
    }

    /// Places one food item at `pos` if the spot is free.
    pub fn place_food(&mut self, pos: DVec2) -> Option<FoodKey> {
        let ant_bounds = self.ant_bounds();
        let before = self.economy.available();
        let key = self.economy.place_at(pos, &self.nest, &ant_bounds);
        self.note_supply(before);
        key
    }

    /// Adds an ant as-is. Fresh ants should come from the controller; this is for setups.
    pub fn insert_ant(&mut self, ant: Ant) -> AntKey {
        self.ants.insert(ant)
    }

    fn ant_bounds(&self) -> Vec<Aabb> {
        self.ants.values().map(|a| a.bounds()).collect()
    }

    fn note_supply(&mut self, before: u64) {
        if before == 0 && self.economy.available() > 0 && self.supply_since.is_none() {
            self.supply_since = Some(self.time());
        }
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.economy.available(),
            self.economy.spawned_total() - self.economy.delivered_total(),
            "food supply out of balance"
        );
        debug_assert_eq!(
            self.cumulative_arrivals,
            self.economy.delivered_total(),
            "arrivals and deliveries disagree"
        );
        debug_assert!(
            self.ants.values().all(|a| self.arena.contains(a.position())),
            "ant outside the arena"
        );
    }

    /// Read-only view of the committed state for renderers.
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut entities = Vec::with_capacity(1 + self.economy.items.len() + self.ants.len());
        entities.push(EntitySnapshot {
            kind: EntityKind::Nest,
            x: self.nest.pos.x,
            y: self.nest.pos.y,
            heading: 0.0,
            size: self.nest.size,
        });
        entities.extend(self.economy.items.values().map(|f| EntitySnapshot {
            kind: EntityKind::Food,
            x: f.pos.x,
            y: f.pos.y,
            heading: 0.0,
            size: f.size,
        }));
        entities.extend(self.ants.values().map(Ant::snapshot));

        WorldSnapshot {
            width: self.arena.width,
            height: self.arena.height,
            sample: self.last_sample(),
            entities,
        }
    }

    /// The most recent committed sample, or an empty one before the first tick.
    pub fn last_sample(&self) -> TickSample {
        let h = &self.history;
        match h.len().checked_sub(1) {
            Some(i) => TickSample {
                tick: self.tick.saturating_sub(1),
                time: self.tick.saturating_sub(1) as f64 * self.config.run.dt,
                arrivals: h.arrivals[i],
                departures: h.departures[i],
                cumulative_arrivals: h.cumulative_arrivals[i],
                cumulative_departures: h.cumulative_departures[i],
                population: h.population[i],
                alpha: h.alpha[i],
                food_available: h.food_available[i],
                food_collected: h.food_collected[i],
            },
            None => TickSample {
                alpha: self.controller.alpha(),
                food_available: self.economy.available(),
                population: self.ants.len() as u64,
                ..TickSample::default()
            },
        }
    }

    pub fn report(&self) -> RunReport {
        let outcome = if self.economy.picked_up_total() == 0 {
            ForagingOutcome::NoFoodCollected
        } else if self.depletion_times.is_empty() {
            ForagingOutcome::NeverDepleted
        } else {
            let events = self.depletion_times.len();
            ForagingOutcome::Depleted {
                events,
                mean_time: self.depletion_times.iter().sum::<f64>() / events as f64,
            }
        };

        RunReport {
            ticks: self.tick,
            simulated_seconds: self.time(),
            outcome,
            food_picked_up: self.economy.picked_up_total(),
            food_delivered: self.economy.delivered_total(),
            food_spawned: self.economy.spawned_total(),
            total_departures: self.cumulative_departures,
            total_distance: self.total_distance,
            max_population: self.max_population,
        }
    }
}
