//! Interactive `explore` session.
//!
//! Reads commands from stdin and turns `view` commands into viewport changes
//! for a [`ViewportScanController`], so discovery runs exactly as it would
//! behind a real map: zoom-gated, debounced, one scan per area. Scan outcomes
//! are printed as they arrive.

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context as _;
use stadiumap_core::{Coordinates, Stadium, Viewport};
use stadiumap_discovery::{
    viewport_bucket, ScanConfig, ScanEvent, SkipReason, ViewportScanController,
};
use stadiumap_gemini::{GeminiClient, GeminiError, InsightCache};
use stadiumap_store::{current_identity, toggle_visited, Identity, VisitedSet};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::context::AppContext;
use crate::stadiums::{print_insight, print_stadium_details, print_stadium_table};

/// Size of the virtual map the `view` command positions.
const VIEW_WIDTH_PX: u32 = 1280;
const VIEW_HEIGHT_PX: u32 = 800;
const MAX_ZOOM: u8 = 22;

const HELP: &str = "\
commands:
  view <lat> <lng> <zoom>   move the map (discovery runs at zoom 6+)
  search [term]             filter by name, city or team; no term clears it
  list                      stadiums visible at the current zoom and search
  select <id>               details and AI trivia for one stadium
  visit <id>                mark or unmark a stadium as visited
  status                    scanning state and session counters
  help                      this text
  quit                      leave";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExploreCommand {
    View { center: Coordinates, zoom: u8 },
    Search(String),
    List,
    Select(String),
    Visit(String),
    Status,
    Help,
    Quit,
}

impl ExploreCommand {
    /// Parse one input line. A blank line is `Ok(None)`.
    pub(crate) fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head.to_lowercase().as_str() {
            "view" | "goto" => Self::parse_view(&rest)?,
            "search" | "find" => Self::Search(rest.join(" ")),
            "list" | "ls" => Self::List,
            "select" | "show" => Self::Select(single_id(head, &rest)?),
            "visit" => Self::Visit(single_id(head, &rest)?),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => anyhow::bail!("unknown command '{other}'; type `help`"),
        };
        Ok(Some(command))
    }

    fn parse_view(args: &[&str]) -> anyhow::Result<Self> {
        const USAGE: &str = "usage: view <lat> <lng> <zoom>";
        let [lat, lng, zoom] = args else {
            anyhow::bail!(USAGE);
        };
        let lat: f64 = lat.parse().with_context(|| format!("bad latitude '{lat}'; {USAGE}"))?;
        let lng: f64 = lng.parse().with_context(|| format!("bad longitude '{lng}'; {USAGE}"))?;
        let zoom: u8 = zoom.parse().with_context(|| format!("bad zoom '{zoom}'; {USAGE}"))?;

        let center = Coordinates::new(lat, lng);
        anyhow::ensure!(
            center.is_valid(),
            "latitude must be within [-90, 90], got {lat}"
        );
        anyhow::ensure!(zoom <= MAX_ZOOM, "zoom must be at most {MAX_ZOOM}, got {zoom}");
        Ok(Self::View { center, zoom })
    }
}

fn single_id(command: &str, args: &[&str]) -> anyhow::Result<String> {
    match args {
        [id] => Ok((*id).to_owned()),
        _ => anyhow::bail!("usage: {command} <stadium-id>"),
    }
}

struct ExploreSession<'a> {
    ctx: &'a AppContext,
    controller: ViewportScanController<Arc<GeminiClient>>,
    insights: InsightCache<Arc<GeminiClient>>,
    identity: Identity,
    zoom: u8,
    search: String,
}

impl ExploreSession<'_> {
    async fn handle(&mut self, command: ExploreCommand) -> anyhow::Result<()> {
        match command {
            ExploreCommand::View { center, zoom } => self.view(center, zoom),
            ExploreCommand::Search(term) => self.search(term).await?,
            ExploreCommand::List => self.list()?,
            ExploreCommand::Select(id) => self.select(&id).await?,
            ExploreCommand::Visit(id) => self.visit(&id)?,
            ExploreCommand::Status => self.status(),
            ExploreCommand::Help => println!("{HELP}"),
            ExploreCommand::Quit => {}
        }
        Ok(())
    }

    fn view(&mut self, center: Coordinates, zoom: u8) {
        let viewport = Viewport::around(center, zoom, VIEW_WIDTH_PX, VIEW_HEIGHT_PX);
        self.zoom = zoom;
        self.controller.on_viewport_changed(viewport);

        let config = self.controller.config();
        let bucket = viewport_bucket(&viewport);
        if zoom < config.min_scan_zoom {
            println!("zoom {} or closer to discover stadiums here", config.min_scan_zoom);
        } else if self.controller.has_scanned(&bucket) {
            println!("area {bucket} already scanned");
        } else {
            println!(
                "scanning {bucket} in {} ms unless the view changes",
                config.debounce.as_millis()
            );
        }
        println!(
            "{} stadium(s) visible",
            self.controller.visible(self.zoom, &self.search).len()
        );
    }

    async fn search(&mut self, term: String) -> anyhow::Result<()> {
        self.search = term.trim().to_owned();
        if self.search.is_empty() {
            println!("search cleared");
            return self.list();
        }

        if self.controller.visible(self.zoom, &self.search).is_empty() {
            match self.ctx.gemini.search_stadium(&self.search).await {
                Ok(Some(found)) => {
                    let added = self.controller.add_stadiums(vec![found]);
                    if added.is_empty() {
                        println!("online result duplicates a known stadium");
                    } else {
                        println!("found online: {}", added[0].name);
                    }
                }
                Ok(None) => println!("nothing found online for '{}'", self.search),
                Err(GeminiError::MissingApiKey) => {}
                Err(e) => return Err(e).context("searching online"),
            }
        }
        self.list()
    }

    fn list(&self) -> anyhow::Result<()> {
        let visible = self.controller.visible(self.zoom, &self.search);
        if visible.is_empty() {
            println!("nothing to show");
            return Ok(());
        }
        let visited = VisitedSet::load(&self.ctx.store, &self.identity)?;
        print_stadium_table(&visible, &visited);
        Ok(())
    }

    async fn select(&self, id: &str) -> anyhow::Result<()> {
        let stadium = self
            .controller
            .stadium(id)
            .ok_or_else(|| anyhow::anyhow!("unknown stadium '{id}'"))?;
        let visited = VisitedSet::load(&self.ctx.store, &self.identity)?;

        print_stadium_details(&stadium, visited.contains(&stadium.id));
        let insight = self.insights.get_or_fetch(&stadium).await;
        print_insight(&insight);
        Ok(())
    }

    fn visit(&self, id: &str) -> anyhow::Result<()> {
        let stadium = self
            .controller
            .stadium(id)
            .ok_or_else(|| anyhow::anyhow!("unknown stadium '{id}'"))?;
        let now_visited = toggle_visited(&self.ctx.store, &self.identity, &stadium.id)?;
        if now_visited {
            println!("marked {} visited", stadium.display_name());
        } else {
            println!("unmarked {}", stadium.display_name());
        }
        Ok(())
    }

    fn status(&self) {
        println!("state:          {:?}", self.controller.state());
        println!("identity:       {}", self.identity);
        println!("zoom:           {}", self.zoom);
        println!(
            "search:         {}",
            if self.search.is_empty() { "(none)" } else { &self.search }
        );
        println!("known stadiums: {}", self.controller.known_stadiums().len());
        println!("scanned areas:  {}", self.controller.scanned_area_count());
        println!("cached trivia:  {}", self.insights.len());
        println!(
            "AI:             {}",
            if self.ctx.gemini.has_api_key() {
                self.ctx.gemini.model()
            } else {
                "disabled (GEMINI_API_KEY not set)"
            }
        );
    }
}

/// Run the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the current identity cannot
/// be loaded. Failures of individual commands are printed and the session
/// continues.
pub(crate) async fn run_explore(ctx: &AppContext) -> anyhow::Result<()> {
    let controller = ViewportScanController::new(
        Arc::clone(&ctx.gemini),
        ctx.seed.clone(),
        ScanConfig::from_app_config(&ctx.config),
    );
    let reporter = tokio::spawn(report_scan_events(controller.subscribe_events()));

    let mut session = ExploreSession {
        ctx,
        controller,
        insights: InsightCache::new(Arc::clone(&ctx.gemini)),
        identity: current_identity(&ctx.store)?,
        zoom: 3,
        search: String::new(),
    };

    println!(
        "exploring as {}; {} built-in stadiums. type `help` for commands.",
        session.identity,
        ctx.seed.len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        match ExploreCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ExploreCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = session.handle(command).await {
                    eprintln!("error: {e:#}");
                }
            }
            Err(e) => eprintln!("{e:#}"),
        }
    }

    drop(session);
    reporter.abort();
    Ok(())
}

async fn report_scan_events(mut events: broadcast::Receiver<ScanEvent>) {
    loop {
        match events.recv().await {
            Ok(ScanEvent::Completed { bucket, added }) if added.is_empty() => {
                println!("\n[scan {bucket}] nothing new");
            }
            Ok(ScanEvent::Completed { bucket, added }) => {
                let names: Vec<&str> = added.iter().map(Stadium::display_name).collect();
                println!("\n[scan {bucket}] {} new: {}", added.len(), names.join(", "));
            }
            Ok(ScanEvent::Failed { bucket, error }) => {
                println!("\n[scan {bucket}] failed: {error}; the area will be retried");
            }
            Ok(ScanEvent::Skipped {
                bucket,
                reason: SkipReason::AlreadyInFlight,
            }) => {
                println!("\n[scan {bucket}] already in progress");
            }
            Ok(ScanEvent::Skipped { bucket, reason }) => {
                tracing::debug!(bucket = %bucket, ?reason, "scan skipped");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "scan event reporter fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
#[path = "explore_test.rs"]
mod tests;
