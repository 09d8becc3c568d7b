//! The session's append-only collection of known stadiums.

use std::collections::HashSet;

use stadiumap_core::Stadium;

use crate::dedup::merge_within;

/// Ordered, id-unique stadiums known to the session.
///
/// Starts from the seed set and only ever grows. Seed ids are remembered so
/// level-of-detail filtering can tell built-in stadiums from discovered ones.
#[derive(Debug, Clone, Default)]
pub struct KnownStadiums {
    stadiums: Vec<Stadium>,
    ids: HashSet<String>,
    seed_ids: HashSet<String>,
}

impl KnownStadiums {
    /// Build a collection from the seed set. Later duplicates of an id are
    /// ignored.
    #[must_use]
    pub fn seeded(seed: Vec<Stadium>) -> Self {
        let mut known = Self::default();
        for stadium in seed {
            if known.ids.insert(stadium.id.clone()) {
                known.seed_ids.insert(stadium.id.clone());
                known.stadiums.push(stadium);
            }
        }
        known
    }

    /// Deduplicate `candidates` against the current contents and append the
    /// survivors. Returns the stadiums that were added.
    pub fn merge_and_append(
        &mut self,
        candidates: Vec<Stadium>,
        radius_meters: f64,
    ) -> Vec<Stadium> {
        let survivors = merge_within(&self.stadiums, candidates, radius_meters);
        for stadium in &survivors {
            self.ids.insert(stadium.id.clone());
            self.stadiums.push(stadium.clone());
        }
        survivors
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Stadium] {
        &self.stadiums
    }

    #[must_use]
    pub fn seed_ids(&self) -> &HashSet<String> {
        &self.seed_ids
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Stadium> {
        if !self.ids.contains(id) {
            return None;
        }
        self.stadiums.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stadiums.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stadiums.is_empty()
    }
}
