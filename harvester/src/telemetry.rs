//! Per-tick telemetry: history recording, sinks and the end-of-run report.

use bincode::{decode_from_slice, encode_to_vec};
use bincode_derive::{Decode, Encode};
use shared::TickSample;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::HistoryError;

/// Receives one committed sample after every tick.
///
/// Sinks only ever see shared references: they cannot reach back into the simulation.
pub trait TelemetrySink {
    fn record(&mut self, sample: &TickSample);
}

impl<F: FnMut(&TickSample)> TelemetrySink for F {
    fn record(&mut self, sample: &TickSample) {
        self(sample)
    }
}

/// Discards every sample.
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&mut self, _sample: &TickSample) {}
}

/// Logs a sample through `tracing` every `every` ticks.
pub struct TracingSink {
    every: u64,
}

impl TracingSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl TelemetrySink for TracingSink {
    fn record(&mut self, s: &TickSample) {
        if s.tick % self.every == 0 {
            info!(
                tick = s.tick,
                time = s.time,
                alpha = s.alpha,
                population = s.population,
                arrivals = s.cumulative_arrivals,
                departures = s.cumulative_departures,
                food_available = s.food_available,
                "tick"
            );
        }
    }
}

/// Append-only per-tick series, one entry per tick.
#[derive(Debug, Clone, Default, PartialEq, Encode, Decode)]
pub struct RunHistory {
    pub arrivals: Vec<u32>,
    pub departures: Vec<u32>,
    pub cumulative_arrivals: Vec<u64>,
    pub cumulative_departures: Vec<u64>,
    pub population: Vec<u64>,
    pub alpha: Vec<f64>,
    pub food_available: Vec<u64>,
    pub food_collected: Vec<u64>,
}

impl RunHistory {
    pub fn push(&mut self, s: &TickSample) {
        self.arrivals.push(s.arrivals);
        self.departures.push(s.departures);
        self.cumulative_arrivals.push(s.cumulative_arrivals);
        self.cumulative_departures.push(s.cumulative_departures);
        self.population.push(s.population);
        self.alpha.push(s.alpha);
        self.food_available.push(s.food_available);
        self.food_collected.push(s.food_collected);
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let bytes = encode_to_vec(self, bincode::config::standard())?;
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let bytes = fs::read(path)?;
        let (history, _) = decode_from_slice(&bytes, bincode::config::standard())?;
        Ok(history)
    }
}

/// How the food supply fared over the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForagingOutcome {
    /// No ant ever picked up food. There is no collection time to average.
    NoFoodCollected,
    /// Food was collected but the supply never ran out.
    NeverDepleted,
    /// The supply ran out `events` times, after `mean_time` simulated seconds on average.
    Depleted { events: usize, mean_time: f64 },
}

/// End-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub ticks: u64,
    pub simulated_seconds: f64,
    pub outcome: ForagingOutcome,
    pub food_picked_up: u64,
    pub food_delivered: u64,
    pub food_spawned: u64,
    pub total_departures: u64,
    pub total_distance: f64,
    pub max_population: u64,
}

impl RunReport {
    pub fn no_food_collected(&self) -> bool {
        self.outcome == ForagingOutcome::NoFoodCollected
    }

    /// Mean time from a supply becoming available to it being fully delivered.
    pub fn mean_collection_time(&self) -> Option<f64> {
        match self.outcome {
            ForagingOutcome::Depleted { mean_time, .. } => Some(mean_time),
            _ => None,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Ran {} ticks ({:.1} simulated seconds)",
            self.ticks, self.simulated_seconds
        )?;
        match self.outcome {
            ForagingOutcome::NoFoodCollected => {
                writeln!(f, "  mean time to collect all food: undefined (no food collected)")?
            }
            ForagingOutcome::NeverDepleted => {
                writeln!(f, "  mean time to collect all food: undefined (supply never ran out)")?
            }
            ForagingOutcome::Depleted { events, mean_time } => writeln!(
                f,
                "  mean time to collect all food: {:.2}s over {} depletion events",
                mean_time, events
            )?,
        }
        writeln!(
            f,
            "  food spawned / picked up / delivered: {} / {} / {}",
            self.food_spawned, self.food_picked_up, self.food_delivered
        )?;
        writeln!(f, "  total departures: {}", self.total_departures)?;
        writeln!(f, "  total distance travelled: {:.1}", self.total_distance)?;
        write!(f, "  max simultaneous foragers: {}", self.max_population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u64) -> TickSample {
        TickSample {
            tick,
            time: tick as f64 * 0.05,
            arrivals: (tick % 3) as u32,
            departures: 1,
            cumulative_arrivals: tick,
            cumulative_departures: tick + 1,
            population: 4,
            alpha: 0.25,
            food_available: 10 - tick,
            food_collected: tick,
        }
    }

    #[test]
    fn history_file_round_trip() {
        let mut history = RunHistory::default();
        for tick in 0..10 {
            history.push(&sample(tick));
        }
        let path = std::env::temp_dir().join(format!(
            "harvester-history-{}.bin",
            std::process::id()
        ));
        history.save(&path).unwrap();
        let loaded = RunHistory::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, history);
        assert_eq!(loaded.len(), 10);
    }

    #[test]
    fn loading_a_missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("harvester-history-does-not-exist.bin");
        assert!(matches!(RunHistory::load(&path), Err(HistoryError::Io(_))));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |s: &TickSample| seen.push(s.tick);
            for tick in 0..3 {
                sink.record(&sample(tick));
            }
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn report_flags_missing_food() {
        let report = RunReport {
            ticks: 100,
            simulated_seconds: 5.0,
            outcome: ForagingOutcome::NoFoodCollected,
            food_picked_up: 0,
            food_delivered: 0,
            food_spawned: 0,
            total_departures: 1,
            total_distance: 0.0,
            max_population: 1,
        };
        assert!(report.no_food_collected());
        assert_eq!(report.mean_collection_time(), None);
        assert!(report.to_string().contains("no food collected"));
    }
}
