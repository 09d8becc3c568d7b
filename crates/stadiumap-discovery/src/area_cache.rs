//! Memo of viewport buckets that have already been scanned this session.
//!
//! Grows for the lifetime of the session and never evicts; the number of
//! buckets is bounded by how much a person can pan and zoom.

use std::collections::HashSet;

/// Coarse key for a viewport: center rounded to 0.1° plus the zoom level.
///
/// Two views whose rounded centers and zoom coincide share a key even when
/// their true bounds differ slightly.
#[must_use]
pub fn bucket_key(center_lat: f64, center_lng: f64, zoom: u8) -> String {
    format!("{center_lat:.1},{center_lng:.1},{zoom}")
}

#[derive(Debug, Default, Clone)]
pub struct ScannedAreas {
    keys: HashSet<String>,
}

impl ScannedAreas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_scanned(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn mark_scanned(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
