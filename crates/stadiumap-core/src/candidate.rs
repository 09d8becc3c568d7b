//! Validation of stadium records coming back from a discovery source.
//!
//! Discovery answers are model-generated JSON, so every field is treated as
//! optional on the wire. [`RawStadium::into_stadium`] turns a record into a
//! [`Stadium`] or rejects it; rejected records never reach deduplication.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::normalize_longitude;
use crate::types::{Coordinates, Stadium};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Stadium record as delivered by a discovery source, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStadium {
    pub id: Option<String>,
    pub name: Option<String>,
    pub common_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub capacity: Option<f64>,
    pub home_teams: Option<Vec<String>>,
    pub coordinates: Option<RawCoordinates>,
    pub image_url: Option<String>,
}

/// Why a discovered record was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationReject {
    #[error("candidate is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("candidate '{name}' has invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { name: String, lat: f64, lng: f64 },

    #[error("candidate '{name}' has invalid capacity {capacity}")]
    InvalidCapacity { name: String, capacity: f64 },
}

impl RawStadium {
    /// Validate and convert into a [`Stadium`].
    ///
    /// Longitude is normalized into `[-180, 180)`. A blank `id` is derived
    /// from the name with [`slugify`]. Fractional capacities truncate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationReject`] when a required field is missing or blank,
    /// the latitude is out of range, or the capacity is negative or not finite.
    pub fn into_stadium(self) -> Result<Stadium, ValidationReject> {
        let name = non_blank(self.name).ok_or(ValidationReject::MissingField("name"))?;
        let city = non_blank(self.city).ok_or(ValidationReject::MissingField("city"))?;
        let country = non_blank(self.country).ok_or(ValidationReject::MissingField("country"))?;

        let raw_coords = self
            .coordinates
            .ok_or(ValidationReject::MissingField("coordinates"))?;
        let lat = raw_coords
            .lat
            .ok_or(ValidationReject::MissingField("coordinates.lat"))?;
        let lng = raw_coords
            .lng
            .ok_or(ValidationReject::MissingField("coordinates.lng"))?;
        let coordinates = Coordinates::new(lat, lng);
        if !coordinates.is_valid() {
            return Err(ValidationReject::InvalidCoordinates { name, lat, lng });
        }

        let capacity = self
            .capacity
            .ok_or(ValidationReject::MissingField("capacity"))?;
        if !capacity.is_finite() || capacity < 0.0 || capacity > f64::from(u32::MAX) {
            return Err(ValidationReject::InvalidCapacity { name, capacity });
        }
        // Range checked above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capacity = capacity.trunc() as u32;

        let id = match non_blank(self.id) {
            Some(id) => id,
            None => {
                let slug = slugify(&name);
                if slug.is_empty() {
                    return Err(ValidationReject::MissingField("id"));
                }
                slug
            }
        };

        let home_teams = self
            .home_teams
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Stadium {
            id,
            name,
            common_name: non_blank(self.common_name),
            city,
            country,
            capacity,
            home_teams,
            coordinates: Coordinates::new(lat, normalize_longitude(lng)),
            image_url: non_blank(self.image_url),
        })
    }
}

/// Convert a batch, silently dropping rejected records.
///
/// Each rejection is logged at debug level; the survivors keep their order.
#[must_use]
pub fn validate_candidates(raw: Vec<RawStadium>) -> Vec<Stadium> {
    raw.into_iter()
        .filter_map(|candidate| match candidate.into_stadium() {
            Ok(stadium) => Some(stadium),
            Err(reject) => {
                tracing::debug!(reason = %reject, "dropping discovered stadium candidate");
                None
            }
        })
        .collect()
}

/// Kebab-case slug of a display name: ASCII alphanumerics kept, spaces become
/// dashes, everything else is dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c.is_whitespace() {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
