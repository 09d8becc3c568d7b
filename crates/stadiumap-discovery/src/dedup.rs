//! Merging discovered stadiums into the known collection.

use std::collections::HashSet;

use stadiumap_core::{distance_meters, Stadium};

/// Candidates closer than this to a known stadium are the same venue.
pub const DEDUP_RADIUS_METERS: f64 = 1_000.0;

/// Return the candidates worth appending to `known`, using the default
/// 1000 m proximity radius. See [`merge_within`].
#[must_use]
pub fn merge(known: &[Stadium], candidates: Vec<Stadium>) -> Vec<Stadium> {
    merge_within(known, candidates, DEDUP_RADIUS_METERS)
}

/// Return the candidates worth appending to `known`.
///
/// A candidate is rejected when its `id` matches a known stadium or an
/// earlier accepted candidate, or when it lies strictly closer than
/// `radius_meters` to any known stadium. Survivors keep their input order.
///
/// Candidates are only checked for proximity against `known`, never against
/// each other, so two near-identical records in one batch both pass.
#[must_use]
pub fn merge_within(
    known: &[Stadium],
    candidates: Vec<Stadium>,
    radius_meters: f64,
) -> Vec<Stadium> {
    let mut seen_ids: HashSet<String> = known.iter().map(|s| s.id.clone()).collect();
    let mut survivors = Vec::new();

    for candidate in candidates {
        if seen_ids.contains(&candidate.id) {
            tracing::trace!(id = %candidate.id, "rejecting candidate with known id");
            continue;
        }

        let near = known.iter().find(|existing| {
            distance_meters(existing.coordinates, candidate.coordinates) < radius_meters
        });
        if let Some(existing) = near {
            tracing::trace!(
                id = %candidate.id,
                existing = %existing.id,
                "rejecting candidate near a known stadium"
            );
            continue;
        }

        seen_ids.insert(candidate.id.clone());
        survivors.push(candidate);
    }

    survivors
}
