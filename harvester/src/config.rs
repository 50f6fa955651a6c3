use macroquad::prelude::Conf;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, LoadError};

// Window constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1200.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Arena rectangle and nest placement.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    pub nest_x: f64,
    pub nest_y: f64,
    pub nest_size: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            nest_x: 400.0,
            nest_y: 300.0,
            nest_size: 40.0,
        }
    }
}

/// Per-ant movement parameters. Speed is in arena units per tick.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AntConfig {
    pub speed: f64,
    pub jitter: f64,
    pub size: f64,
    /// Outbound ants give up and walk home empty after this many ticks without food.
    pub max_search_ticks: Option<u64>,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jitter: 0.1,
            size: 10.0,
            max_search_ticks: None,
        }
    }
}

/// Recruitment controller gains. `alpha` is expected departures per tick.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RecruitmentConfig {
    pub c: f64,
    pub q: f64,
    pub d: f64,
    pub alpha_min: f64,
    pub initial_alpha: Option<f64>,
}

impl Default for RecruitmentConfig {
    fn default() -> Self {
        Self {
            c: 0.1,
            q: 0.05,
            d: 0.0,
            alpha_min: 0.01,
            initial_alpha: None,
        }
    }
}

/// Food item footprint and the replenishment schedule (times in simulated seconds).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FoodConfig {
    pub size: f64,
    pub first_drop: f64,
    pub cadence: f64,
    pub drop_amount: u32,
    pub placement_retries: u32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            first_drop: 0.0,
            cadence: 30.0,
            drop_amount: 10,
            placement_retries: 1000,
        }
    }
}

/// Timestep, run budget and seed.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Simulated seconds per tick.
    pub dt: f64,
    pub seconds: f64,
    /// Overrides `seconds` when set.
    pub ticks: Option<u64>,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 20.0,
            seconds: 120.0,
            ticks: None,
            seed: 42,
        }
    }
}

impl RunConfig {
    /// Number of ticks the run lasts.
    pub fn total_ticks(&self) -> u64 {
        match self.ticks {
            Some(ticks) => ticks,
            None => (self.seconds / self.dt).ceil() as u64,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub arena: ArenaConfig,
    pub ant: AntConfig,
    pub recruitment: RecruitmentConfig,
    pub food: FoodConfig,
    pub run: RunConfig,
}

impl SimulationConfig {
    /// Reads a TOML file. Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: SimulationConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the simulation cannot run faithfully.
    /// Nothing is clamped here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let run = &self.run;
        if !(run.dt.is_finite() && run.dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(run.dt));
        }
        if !(run.seconds.is_finite() && run.seconds >= 0.0) {
            return Err(invalid("run.seconds", "finite and non-negative", run.seconds));
        }

        let food = &self.food;
        if !(food.cadence.is_finite() && food.cadence > 0.0) {
            return Err(ConfigError::InvalidCadence(food.cadence));
        }
        if !(food.first_drop.is_finite() && food.first_drop >= 0.0) {
            return Err(ConfigError::InvalidFirstDrop(food.first_drop));
        }
        if !(food.size.is_finite() && food.size > 0.0) {
            return Err(invalid("food.size", "positive", food.size));
        }
        if food.placement_retries == 0 {
            return Err(invalid("food.placement_retries", "at least 1", 0.0));
        }

        let ant = &self.ant;
        if !(ant.speed.is_finite() && ant.speed >= 0.0) {
            return Err(invalid("ant.speed", "finite and non-negative", ant.speed));
        }
        if !(ant.jitter.is_finite() && ant.jitter >= 0.0) {
            return Err(invalid("ant.jitter", "finite and non-negative", ant.jitter));
        }
        if !(ant.size.is_finite() && ant.size > 0.0) {
            return Err(invalid("ant.size", "positive", ant.size));
        }

        let rec = &self.recruitment;
        for (name, value) in [
            ("recruitment.c", rec.c),
            ("recruitment.q", rec.q),
            ("recruitment.d", rec.d),
            ("recruitment.alpha_min", rec.alpha_min),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(name, "finite and non-negative", value));
            }
        }
        if let Some(alpha) = rec.initial_alpha {
            if !(alpha.is_finite() && alpha >= rec.alpha_min) {
                return Err(invalid("recruitment.initial_alpha", "at least alpha_min", alpha));
            }
        }

        self.validate_arena()
    }

    fn validate_arena(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !(arena.width.is_finite() && arena.width > 0.0) {
            return Err(invalid("arena.width", "positive", arena.width));
        }
        if !(arena.height.is_finite() && arena.height > 0.0) {
            return Err(invalid("arena.height", "positive", arena.height));
        }
        if !(arena.nest_size.is_finite() && arena.nest_size > 0.0) {
            return Err(invalid("arena.nest_size", "positive", arena.nest_size));
        }

        let half = arena.nest_size / 2.0;
        if arena.nest_x - half < 0.0
            || arena.nest_y - half < 0.0
            || arena.nest_x + half > arena.width
            || arena.nest_y + half > arena.height
        {
            return Err(ConfigError::NestOutsideArena {
                x: arena.nest_x,
                y: arena.nest_y,
                width: arena.width,
                height: arena.height,
            });
        }

        let food = &self.food;
        if food.size > arena.width || food.size > arena.height {
            return Err(ConfigError::ArenaTooSmall(format!(
                "a {} unit food item does not fit in a {}x{} arena",
                food.size, arena.width, arena.height
            )));
        }

        // A batch must at least fit by area next to the nest, or placement can never succeed.
        let required = food.drop_amount as f64 * food.size * food.size
            + arena.nest_size * arena.nest_size;
        let available = arena.width * arena.height;
        if required > available {
            return Err(ConfigError::ArenaTooSmall(format!(
                "a batch of {} food items plus the nest needs {:.0} square units, the arena has {:.0}",
                food.drop_amount, required, available
            )));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, requirement: &'static str, value: f64) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        requirement,
        value,
    }
}

pub fn window_conf() -> Conf {
    Conf {
        window_title: "Harvester".to_owned(),
        window_width: DEFAULT_WINDOW_WIDTH as i32,
        window_height: DEFAULT_WINDOW_HEIGHT as i32,
        high_dpi: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn negative_timestep_is_rejected() {
        let mut config = SimulationConfig::default();
        config.run.dt = -0.05;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimestep(-0.05)));
    }

    #[test]
    fn negative_cadence_is_rejected() {
        let mut config = SimulationConfig::default();
        config.food.cadence = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidCadence(-1.0)));
    }

    #[test]
    fn crowded_arena_is_rejected() {
        let mut config = SimulationConfig::default();
        config.arena = ArenaConfig {
            width: 100.0,
            height: 100.0,
            nest_x: 50.0,
            nest_y: 50.0,
            nest_size: 40.0,
        };
        config.food.drop_amount = 30;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaTooSmall(_))
        ));
    }

    #[test]
    fn nest_must_fit_inside_arena() {
        let mut config = SimulationConfig::default();
        config.arena.nest_x = 5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NestOutsideArena { .. })
        ));
    }

    #[test]
    fn initial_alpha_below_floor_is_rejected() {
        let mut config = SimulationConfig::default();
        config.recruitment.initial_alpha = Some(0.001);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "recruitment.initial_alpha",
                ..
            })
        ));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [recruitment]
            c = 0.5

            [run]
            seed = 7
            ticks = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.recruitment.c, 0.5);
        assert_eq!(config.recruitment.q, RecruitmentConfig::default().q);
        assert_eq!(config.run.seed, 7);
        assert_eq!(config.run.total_ticks(), 100);
        assert_eq!(config.arena, ArenaConfig::default());
    }

    #[test]
    fn run_budget_from_seconds() {
        let run = RunConfig {
            dt: 0.25,
            seconds: 10.0,
            ticks: None,
            seed: 0,
        };
        assert_eq!(run.total_ticks(), 40);
    }
}
