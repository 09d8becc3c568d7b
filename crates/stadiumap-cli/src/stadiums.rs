//! One-shot stadium commands: `list`, `scan`, `find` and `insight`.
//!
//! Each invocation is its own session, so the known collection starts from
//! the built-in seed set every time.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use stadiumap_core::{AiInsight, Bounds, Stadium, Viewport};
use stadiumap_discovery::{
    select_with_min_zoom, KnownStadiums, ScanConfig, ScanEvent, ViewportScanController,
};
use stadiumap_gemini::{GeminiError, InsightClient};
use stadiumap_store::{current_identity, VisitedSet};

use crate::context::AppContext;

/// Print the stadiums a map at `zoom` with `search` typed in would show.
///
/// # Errors
///
/// Returns an error if the visited set cannot be read.
pub(crate) fn run_list(ctx: &AppContext, zoom: u8, search: &str) -> anyhow::Result<()> {
    let known = KnownStadiums::seeded(ctx.seed.clone());
    let visible = select_with_min_zoom(
        known.as_slice(),
        known.seed_ids(),
        zoom,
        search,
        ctx.config.lod_min_zoom,
    );

    if visible.is_empty() {
        println!("no stadiums match '{}'", search.trim());
        return Ok(());
    }

    let visited = load_visited(ctx)?;
    print_stadium_table(visible, &visited);
    Ok(())
}

/// Run one discovery pass over `bounds` through the scan controller.
///
/// # Errors
///
/// Returns an error if `zoom` is below the scan threshold, the bounds are
/// inverted, or the discovery call fails.
pub(crate) async fn run_scan(ctx: &AppContext, bounds: Bounds, zoom: u8) -> anyhow::Result<()> {
    anyhow::ensure!(
        bounds.north > bounds.south,
        "north ({}) must be greater than south ({})",
        bounds.north,
        bounds.south
    );
    anyhow::ensure!(
        zoom >= ctx.config.scan_min_zoom,
        "zoom {zoom} is below the minimum scan zoom {}; zoom in further",
        ctx.config.scan_min_zoom
    );

    let config = ScanConfig {
        debounce: Duration::ZERO,
        ..ScanConfig::from_app_config(&ctx.config)
    };
    let controller =
        ViewportScanController::new(Arc::clone(&ctx.gemini), ctx.seed.clone(), config);
    let mut events = controller.subscribe_events();
    controller.on_viewport_changed(Viewport::new(bounds, zoom));

    match events.recv().await.context("waiting for scan result")? {
        ScanEvent::Completed { added, .. } if added.is_empty() => {
            println!("no new stadiums found in this area");
        }
        ScanEvent::Completed { added, .. } => {
            println!("found {} new stadium(s):", added.len());
            print_stadium_table(&added, &load_visited(ctx)?);
        }
        ScanEvent::Failed { error, .. } => anyhow::bail!("area scan failed: {error}"),
        ScanEvent::Skipped { bucket, reason } => {
            println!("scan of {bucket} skipped: {reason:?}");
        }
    }
    Ok(())
}

/// Search the built-in stadiums, then the AI when nothing local matches.
///
/// # Errors
///
/// Returns an error if the online search fails for a reason other than a
/// missing API key.
pub(crate) async fn run_find(ctx: &AppContext, query: &str) -> anyhow::Result<()> {
    let mut known = KnownStadiums::seeded(ctx.seed.clone());
    let local = select_with_min_zoom(known.as_slice(), known.seed_ids(), 0, query, 0);
    if !local.is_empty() {
        print_stadium_table(local, &load_visited(ctx)?);
        return Ok(());
    }

    match ctx.gemini.search_stadium(query).await {
        Ok(Some(found)) => {
            let added =
                known.merge_and_append(vec![found.clone()], ctx.config.dedup_radius_meters);
            let visited = load_visited(ctx)?;
            print_stadium_details(&found, visited.contains(&found.id));
            if added.is_empty() {
                println!("(same ground as a built-in stadium)");
            }
            Ok(())
        }
        Ok(None) => {
            println!("no stadium found for '{query}'");
            Ok(())
        }
        Err(GeminiError::MissingApiKey) => {
            println!("no built-in stadium matches '{query}'; set GEMINI_API_KEY to search online");
            Ok(())
        }
        Err(e) => Err(e).context("searching for stadium"),
    }
}

/// Print details and AI trivia for a built-in stadium.
///
/// # Errors
///
/// Returns an error if `id` is not a built-in stadium or the visited set
/// cannot be read.
pub(crate) async fn run_insight(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let stadium = ctx.seed_stadium(id).ok_or_else(|| {
        anyhow::anyhow!("unknown stadium '{id}'; run `stadiumap list` to see ids")
    })?;
    let visited = load_visited(ctx)?;

    print_stadium_details(stadium, visited.contains(&stadium.id));
    let insight = ctx.gemini.fetch_insight(stadium).await;
    print_insight(&insight);
    Ok(())
}

fn load_visited(ctx: &AppContext) -> anyhow::Result<VisitedSet> {
    let identity = current_identity(&ctx.store)?;
    Ok(VisitedSet::load(&ctx.store, &identity)?)
}

pub(crate) fn print_stadium_table<'a, I>(stadiums: I, visited: &VisitedSet)
where
    I: IntoIterator<Item = &'a Stadium>,
{
    println!(
        "{:<2}{:<26}{:<30}{:<18}{:>9}  ID",
        "", "NAME", "TEAMS", "CITY", "CAPACITY"
    );
    for stadium in stadiums {
        let mark = if visited.contains(&stadium.id) { "*" } else { "" };
        println!(
            "{:<2}{:<26}{:<30}{:<18}{:>9}  {}",
            mark,
            truncate(stadium.display_name(), 24),
            truncate(&stadium.home_teams.join(", "), 28),
            truncate(&stadium.city, 16),
            fmt_capacity(stadium.capacity),
            stadium.id
        );
    }
}

pub(crate) fn print_stadium_details(stadium: &Stadium, visited: bool) {
    println!("{} ({})", stadium.name, stadium.id);
    if let Some(common) = &stadium.common_name {
        println!("  also known as {common}");
    }
    println!("  {}, {}", stadium.city, stadium.country);
    println!("  capacity {}", fmt_capacity(stadium.capacity));
    if !stadium.home_teams.is_empty() {
        println!("  home of {}", stadium.home_teams.join(", "));
    }
    println!(
        "  at {:.4}, {:.4}",
        stadium.coordinates.lat, stadium.coordinates.lng
    );
    if let Some(url) = &stadium.image_url {
        println!("  image {url}");
    }
    println!("  {}", if visited { "visited" } else { "not visited yet" });
}

pub(crate) fn print_insight(insight: &AiInsight) {
    println!();
    println!("{}", insight.description);
    println!("Fun fact: {}", insight.fun_fact);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars - 3).collect::<String>())
    } else {
        s.to_owned()
    }
}

/// `99354` -> `99,354`
fn fmt_capacity(capacity: u32) -> String {
    let digits = capacity.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
