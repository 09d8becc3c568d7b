//! Shared domain model for Stadiumap.
//!
//! Holds the stadium data types, great-circle math, the built-in seed set,
//! validation of discovered candidates, and environment-driven configuration.

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod geo;
pub mod seed;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use candidate::{
    slugify, validate_candidates, RawCoordinates, RawStadium, ValidationReject,
};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use geo::{distance_meters, normalize_longitude, EARTH_RADIUS_METERS};
pub use seed::{load_seed_stadiums, parse_seed_stadiums};
pub use types::{AiInsight, Bounds, Coordinates, Stadium, Viewport};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to parse seed stadiums: {0}")]
    SeedParse(#[from] serde_yaml::Error),

    #[error("seed validation error: {0}")]
    Validation(String),
}
