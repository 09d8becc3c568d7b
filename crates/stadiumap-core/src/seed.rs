//! The built-in seed stadiums, shipped as embedded YAML.

use std::collections::HashSet;

use serde::Deserialize;

use crate::types::Stadium;
use crate::ConfigError;

const SEED_YAML: &str = include_str!("../seed/stadiums.yaml");

#[derive(Debug, Deserialize)]
struct SeedFile {
    stadiums: Vec<Stadium>,
}

/// Load and validate the embedded seed set.
///
/// # Errors
///
/// Returns `ConfigError` if the embedded YAML fails to parse or validate.
pub fn load_seed_stadiums() -> Result<Vec<Stadium>, ConfigError> {
    parse_seed_stadiums(SEED_YAML)
}

/// Parse a seed document of the form `stadiums: [...]` and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::SeedParse`] on malformed YAML and
/// [`ConfigError::Validation`] on blank fields, duplicate ids, or
/// out-of-range coordinates.
pub fn parse_seed_stadiums(content: &str) -> Result<Vec<Stadium>, ConfigError> {
    let file: SeedFile = serde_yaml::from_str(content)?;
    validate_seed(&file.stadiums)?;
    Ok(file.stadiums)
}

fn validate_seed(stadiums: &[Stadium]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for stadium in stadiums {
        if stadium.id.trim().is_empty() || stadium.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "seed stadium id and name must be non-empty".to_string(),
            ));
        }

        if !stadium.coordinates.is_valid()
            || !(-180.0..=180.0).contains(&stadium.coordinates.lng)
        {
            return Err(ConfigError::Validation(format!(
                "seed stadium '{}' has out-of-range coordinates",
                stadium.id
            )));
        }

        if !seen_ids.insert(stadium.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate seed stadium id: '{}'",
                stadium.id
            )));
        }
    }

    Ok(())
}
