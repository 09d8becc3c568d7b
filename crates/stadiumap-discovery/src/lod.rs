//! Level-of-detail selection of which known stadiums to render.

use std::collections::HashSet;

use stadiumap_core::Stadium;

/// Below this zoom only seed stadiums are shown.
pub const MIN_DETAIL_ZOOM: u8 = 5;

/// [`select_with_min_zoom`] with the default [`MIN_DETAIL_ZOOM`].
#[must_use]
pub fn select<'a>(
    all: &'a [Stadium],
    seed_ids: &HashSet<String>,
    zoom: u8,
    search_term: &str,
) -> Vec<&'a Stadium> {
    select_with_min_zoom(all, seed_ids, zoom, search_term, MIN_DETAIL_ZOOM)
}

/// Pick the stadiums to render, preserving input order.
///
/// A non-blank search term wins over zoom entirely: every stadium whose name,
/// city or any home team contains the term (case-insensitive) is returned,
/// seed or not, and nothing else. Without a term, zooms below
/// `min_detail_zoom` show only seed stadiums.
#[must_use]
pub fn select_with_min_zoom<'a>(
    all: &'a [Stadium],
    seed_ids: &HashSet<String>,
    zoom: u8,
    search_term: &str,
    min_detail_zoom: u8,
) -> Vec<&'a Stadium> {
    let needle = search_term.trim().to_lowercase();

    if !needle.is_empty() {
        return all
            .iter()
            .filter(|s| matches_search(s, &needle))
            .collect();
    }

    if zoom < min_detail_zoom {
        return all.iter().filter(|s| seed_ids.contains(&s.id)).collect();
    }

    all.iter().collect()
}

fn matches_search(stadium: &Stadium, needle: &str) -> bool {
    stadium.name.to_lowercase().contains(needle)
        || stadium.city.to_lowercase().contains(needle)
        || stadium
            .home_teams
            .iter()
            .any(|team| team.to_lowercase().contains(needle))
}
