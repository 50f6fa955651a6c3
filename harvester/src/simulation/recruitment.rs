//! Closed-loop recruitment of foragers.
//!
//! Each tick the outgoing rate is adapted from the previous departures and
//! the arrivals just observed:
//!
//! ```text
//! alpha_n = max(alpha_prev - q * D_prev + c * A_n - d, alpha_min)
//! D_n     ~ Poisson(alpha_n)
//! ```
//!
//! `alpha` is measured in expected departures per tick. The Poisson draw is
//! taken once per tick with no timestep scaling, so `c`, `q`, `d` and
//! `alpha_min` are all per-tick quantities.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tracing::warn;

use crate::config::RecruitmentConfig;

#[derive(Debug, Clone)]
pub struct RecruitmentController {
    params: RecruitmentConfig,
    alpha: f64,
    last_departures: u32,
}

impl RecruitmentController {
    pub fn new(params: RecruitmentConfig) -> Self {
        let alpha = params
            .initial_alpha
            .unwrap_or(params.alpha_min)
            .max(params.alpha_min);
        Self {
            params,
            alpha,
            last_departures: 0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn last_departures(&self) -> u32 {
        self.last_departures
    }

    /// The rate the next update would produce for `arrivals`, without sampling.
    pub fn next_alpha(&self, arrivals: u32) -> f64 {
        let p = &self.params;
        let alpha = self.alpha - p.q * self.last_departures as f64 + p.c * arrivals as f64 - p.d;
        alpha.max(p.alpha_min)
    }

    /// Advances the controller one tick and returns how many ants leave.
    pub fn update<R: Rng + ?Sized>(&mut self, arrivals: u32, rng: &mut R) -> u32 {
        self.alpha = self.next_alpha(arrivals);
        let departures = sample_poisson(self.alpha, rng);
        self.last_departures = departures;
        departures
    }
}

/// Poisson draw that treats a zero rate as "no events".
pub fn sample_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    match Poisson::new(lambda) {
        Ok(poisson) => {
            let draw: f64 = poisson.sample(rng);
            draw as u32
        }
        Err(e) => {
            warn!(lambda, error = %e, "Poisson rate rejected, emitting no departures");
            0
        }
    }
}
