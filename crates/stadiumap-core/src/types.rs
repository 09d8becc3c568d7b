use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Largest latitude representable on a square Web-Mercator map.
const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Edge length of one map tile in pixels.
const TILE_SIZE_PX: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and latitude lies in `[-90, 90]`.
    ///
    /// Longitude is not range-checked; callers normalize it instead.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A football stadium known to the session.
///
/// Records are immutable once created; the visited set and the insight cache
/// refer to them by `id` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stadium {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    pub city: String,
    pub country: String,
    pub capacity: u32,
    #[serde(default)]
    pub home_teams: Vec<String>,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Stadium {
    /// Name shown to the user: the common name when there is one.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or(&self.name)
    }
}

/// AI-generated trivia about one stadium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub description: String,
    pub fun_fact: String,
}

/// Geographic bounding box in degrees.
///
/// `east` may be smaller than `west` once normalized, when the box straddles
/// the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Midpoint of the box, before any longitude normalization.
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Same box with `east` and `west` mapped into `[-180, 180)`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            north: self.north,
            south: self.south,
            east: crate::geo::normalize_longitude(self.east),
            west: crate::geo::normalize_longitude(self.west),
        }
    }
}

/// A settled map view: the visible bounds plus the integer zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub zoom: u8,
}

impl Viewport {
    #[must_use]
    pub const fn new(bounds: Bounds, zoom: u8) -> Self {
        Self { bounds, zoom }
    }

    /// Derive the viewport a `width_px` × `height_px` Web-Mercator map would
    /// show when centered on `center` at `zoom`.
    #[must_use]
    pub fn around(center: Coordinates, zoom: u8, width_px: u32, height_px: u32) -> Self {
        let world_px = TILE_SIZE_PX * 2f64.powi(i32::from(zoom));
        let half_w = f64::from(width_px) / 2.0;
        let half_h = f64::from(height_px) / 2.0;

        let lng_per_px = 360.0 / world_px;
        let center_y = lat_to_world_y(center.lat, world_px);

        let north = world_y_to_lat((center_y - half_h).max(0.0), world_px);
        let south = world_y_to_lat((center_y + half_h).min(world_px), world_px);

        Self {
            bounds: Bounds {
                north,
                south,
                east: center.lng + half_w * lng_per_px,
                west: center.lng - half_w * lng_per_px,
            },
            zoom,
        }
    }

    #[must_use]
    pub fn center(&self) -> Coordinates {
        self.bounds.center()
    }
}

fn lat_to_world_y(lat: f64, world_px: f64) -> f64 {
    let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
    let merc = (phi.tan() + 1.0 / phi.cos()).ln();
    (1.0 - merc / PI) / 2.0 * world_px
}

fn world_y_to_lat(y: f64, world_px: f64) -> f64 {
    let n = PI * (1.0 - 2.0 * y / world_px);
    n.sinh().atan().to_degrees()
}
