//! Non-spatial colony model.
//!
//! No ants move here: each time slot a binomial share of the foragers comes
//! home successfully, with a success probability that rises logistically
//! with the food supply. Arrivals feed the same recruitment controller as
//! the spatial simulation, which makes this model a quick way to explore
//! controller gains.

use rand::Rng;
use rand_distr::{Binomial, Distribution};
use shared::TickSample;
use tracing::warn;

use crate::config::RecruitmentConfig;
use crate::simulation::RecruitmentController;
use crate::telemetry::RunHistory;

#[derive(Debug, Clone, PartialEq)]
pub struct MeanFieldParams {
    pub p_max: f64,
    pub p_min: f64,
    /// Steepness of the logistic curve.
    pub k: f64,
    pub food_factor: f64,
    pub initial_food: u64,
}

impl Default for MeanFieldParams {
    fn default() -> Self {
        Self {
            p_max: 0.9,
            p_min: 0.1,
            k: 0.1,
            food_factor: 0.01,
            initial_food: 10,
        }
    }
}

impl MeanFieldParams {
    /// Probability that a single forager returns successfully this slot.
    pub fn success_probability(&self, foraging: u64, food: u64) -> f64 {
        let pressure = food as f64 - 10.0 * foraging as f64 * self.food_factor;
        self.p_min + (self.p_max - self.p_min) / (1.0 + (-self.k * pressure).exp())
    }
}

/// Runs `slots` time slots and returns one history entry per slot.
pub fn simulate<R: Rng + ?Sized>(
    slots: usize,
    recruitment: RecruitmentConfig,
    params: &MeanFieldParams,
    rng: &mut R,
) -> RunHistory {
    let mut controller = RecruitmentController::new(recruitment);
    let mut history = RunHistory::default();
    let mut foraging: u64 = 0;
    let mut food = params.initial_food;
    let mut cumulative_arrivals = 0;
    let mut cumulative_departures = 0;

    for slot in 0..slots {
        let p = params.success_probability(foraging, food);
        let arrivals = sample_binomial(foraging, p, rng);
        foraging -= arrivals;
        food += arrivals;

        let departures = controller.update(arrivals as u32, rng);
        foraging += departures as u64;
        cumulative_arrivals += arrivals;
        cumulative_departures += departures as u64;

        history.push(&TickSample {
            tick: slot as u64,
            time: slot as f64,
            arrivals: arrivals as u32,
            departures,
            cumulative_arrivals,
            cumulative_departures,
            population: foraging,
            alpha: controller.alpha(),
            food_available: food,
            food_collected: cumulative_arrivals,
        });
    }
    history
}

fn sample_binomial<R: Rng + ?Sized>(n: u64, p: f64, rng: &mut R) -> u64 {
    if n == 0 {
        return 0;
    }
    match Binomial::new(n, p) {
        Ok(binomial) => binomial.sample(rng),
        Err(e) => {
            warn!(n, p, error = %e, "Binomial parameters rejected, no arrivals");
            0
        }
    }
}
