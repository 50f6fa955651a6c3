use thiserror::Error;

/// A configuration the simulation refuses to run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),

    #[error("food cadence must be positive and finite, got {0}")]
    InvalidCadence(f64),

    #[error("first food drop must be non-negative, got {0}")]
    InvalidFirstDrop(f64),

    #[error("{name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("nest at ({x}, {y}) does not fit inside the {width}x{height} arena")]
    NestOutsideArena {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("arena too small: {0}")]
    ArenaTooSmall(String),
}

/// Failure to read a configuration file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Failure to save or load a run history file.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode history: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode history: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}
