use bincode_derive::{Decode, Encode};

/// What an entity is, as seen by renderers and telemetry consumers.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Nest,
    Food,
    AntAtNest,
    AntOutbound,
    AntReturningWithFood,
    AntReturningEmpty,
}

impl EntityKind {
    pub fn is_ant(self) -> bool {
        !matches!(self, EntityKind::Nest | EntityKind::Food)
    }
}

/// Read-only view of one positioned entity.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub heading: f64, // radians, 0 for static entities
    pub size: f64,    // side length of the square footprint
}

/// Counters committed at the end of one tick.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Default)]
pub struct TickSample {
    pub tick: u64,
    pub time: f64, // simulated seconds at the start of the tick
    pub arrivals: u32,
    pub departures: u32,
    pub cumulative_arrivals: u64,
    pub cumulative_departures: u64,
    pub population: u64,
    pub alpha: f64,
    pub food_available: u64,
    pub food_collected: u64, // cumulative pickups
}

/// Everything an external renderer needs to draw one frame.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub width: f64,
    pub height: f64,
    pub sample: TickSample,
    pub entities: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    pub fn ants(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities.iter().filter(|e| e.kind.is_ant())
    }

    pub fn food(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities.iter().filter(|e| e.kind == EntityKind::Food)
    }
}
