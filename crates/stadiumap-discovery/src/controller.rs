//! Debounced viewport scanning.
//!
//! [`ViewportScanController`] is a small state machine:
//!
//! | state             | entered when                                        |
//! |-------------------|-----------------------------------------------------|
//! | `Idle`            | nothing pending and no scan in flight               |
//! | `PendingDebounce` | a qualifying viewport change restarted the timer    |
//! | `Scanning`        | at least one discovery call is awaiting its answer  |
//!
//! Viewport changes below `min_scan_zoom` are ignored. Every other change
//! replaces the single pending debounce timer, so only the last view inside
//! the quiet window is scanned. When the timer fires the scan is detached from
//! the timer slot: later viewport changes restart the debounce but never
//! cancel a discovery call already on the wire.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use stadiumap_core::{normalize_longitude, AppConfig, Stadium, Viewport};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::area_cache::{bucket_key, ScannedAreas};
use crate::client::DiscoveryClient;
use crate::collection::KnownStadiums;
use crate::dedup::DEDUP_RADIUS_METERS;
use crate::lod::{select_with_min_zoom, MIN_DETAIL_ZOOM};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Views zoomed out further than this never trigger discovery.
    pub min_scan_zoom: u8,
    /// Quiet period after the last qualifying view change.
    pub debounce: Duration,
    pub dedup_radius_meters: f64,
    /// Below this zoom only seed stadiums are visible.
    pub min_detail_zoom: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_scan_zoom: 6,
            debounce: Duration::from_millis(1_000),
            dedup_radius_meters: DEDUP_RADIUS_METERS,
            min_detail_zoom: MIN_DETAIL_ZOOM,
        }
    }
}

impl ScanConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_scan_zoom: config.scan_min_zoom,
            debounce: Duration::from_millis(config.scan_debounce_ms),
            dedup_radius_meters: config.dedup_radius_meters,
            min_detail_zoom: config.lod_min_zoom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    PendingDebounce,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyScanned,
    AlreadyInFlight,
}

/// Outcome of one debounce firing, broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Skipped { bucket: String, reason: SkipReason },
    Completed { bucket: String, added: Vec<Stadium> },
    Failed { bucket: String, error: String },
}

struct Session {
    known: KnownStadiums,
    scanned: ScannedAreas,
    in_flight: HashSet<String>,
}

struct Shared<C> {
    client: C,
    config: ScanConfig,
    session: Mutex<Session>,
    pending: Mutex<Option<JoinHandle<()>>>,
    scanning_tx: watch::Sender<bool>,
    events_tx: broadcast::Sender<ScanEvent>,
}

/// Drives discovery from viewport changes and owns the session's known
/// stadiums and scanned-area memo.
pub struct ViewportScanController<C> {
    shared: Arc<Shared<C>>,
}

impl<C: DiscoveryClient> ViewportScanController<C> {
    #[must_use]
    pub fn new(client: C, seed: Vec<Stadium>, config: ScanConfig) -> Self {
        let (scanning_tx, _) = watch::channel(false);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                client,
                config,
                session: Mutex::new(Session {
                    known: KnownStadiums::seeded(seed),
                    scanned: ScannedAreas::new(),
                    in_flight: HashSet::new(),
                }),
                pending: Mutex::new(None),
                scanning_tx,
                events_tx,
            }),
        }
    }

    /// Feed a settled pan or zoom into the state machine.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_viewport_changed(&self, viewport: Viewport) {
        if viewport.zoom < self.shared.config.min_scan_zoom {
            tracing::trace!(zoom = viewport.zoom, "viewport below scan zoom, ignoring");
            return;
        }

        let shared = Arc::clone(&self.shared);
        let debounce = shared.config.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tokio::spawn(run_scan(shared, viewport));
        });

        let mut pending = lock(&self.shared.pending);
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    #[must_use]
    pub fn state(&self) -> ScanState {
        if self.is_scanning() {
            return ScanState::Scanning;
        }
        let pending = lock(&self.shared.pending);
        if pending.as_ref().is_some_and(|timer| !timer.is_finished()) {
            ScanState::PendingDebounce
        } else {
            ScanState::Idle
        }
    }

    /// `true` while at least one discovery call is awaiting its answer.
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        *self.shared.scanning_tx.borrow()
    }

    #[must_use]
    pub fn subscribe_scanning(&self) -> watch::Receiver<bool> {
        self.shared.scanning_tx.subscribe()
    }

    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<ScanEvent> {
        self.shared.events_tx.subscribe()
    }

    /// Snapshot of every known stadium, seed first, in insertion order.
    #[must_use]
    pub fn known_stadiums(&self) -> Vec<Stadium> {
        lock(&self.shared.session).known.as_slice().to_vec()
    }

    #[must_use]
    pub fn stadium(&self, id: &str) -> Option<Stadium> {
        lock(&self.shared.session).known.get(id).cloned()
    }

    /// Stadiums to render for `zoom` and `search_term`.
    #[must_use]
    pub fn visible(&self, zoom: u8, search_term: &str) -> Vec<Stadium> {
        let session = lock(&self.shared.session);
        select_with_min_zoom(
            session.known.as_slice(),
            session.known.seed_ids(),
            zoom,
            search_term,
            self.shared.config.min_detail_zoom,
        )
        .into_iter()
        .cloned()
        .collect()
    }

    /// Merge stadiums found outside a viewport scan (e.g. a name search).
    /// Returns the ones actually added.
    pub fn add_stadiums(&self, candidates: Vec<Stadium>) -> Vec<Stadium> {
        let mut session = lock(&self.shared.session);
        let radius = self.shared.config.dedup_radius_meters;
        session
            .known
            .merge_and_append(retain_valid(candidates), radius)
    }

    #[must_use]
    pub fn has_scanned(&self, bucket: &str) -> bool {
        lock(&self.shared.session).scanned.has_scanned(bucket)
    }

    #[must_use]
    pub fn scanned_area_count(&self) -> usize {
        lock(&self.shared.session).scanned.len()
    }

    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.shared.config
    }
}

impl<C> Drop for ViewportScanController<C> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.shared.pending).take() {
            timer.abort();
        }
    }
}

/// Bucket key for the settled view, with the center longitude normalized so
/// a view panned a full turn around the globe maps to the same bucket.
#[must_use]
pub fn viewport_bucket(viewport: &Viewport) -> String {
    let center = viewport.center();
    bucket_key(center.lat, normalize_longitude(center.lng), viewport.zoom)
}

async fn run_scan<C: DiscoveryClient>(shared: Arc<Shared<C>>, viewport: Viewport) {
    let bucket = viewport_bucket(&viewport);

    {
        let mut session = lock(&shared.session);
        let skip = if session.scanned.has_scanned(&bucket) {
            Some(SkipReason::AlreadyScanned)
        } else if !session.in_flight.insert(bucket.clone()) {
            Some(SkipReason::AlreadyInFlight)
        } else {
            None
        };
        if let Some(reason) = skip {
            tracing::debug!(bucket = %bucket, ?reason, "skipping area scan");
            drop(session);
            let _ = shared.events_tx.send(ScanEvent::Skipped { bucket, reason });
            return;
        }
        shared.scanning_tx.send_replace(true);
    }

    let bounds = viewport.bounds.normalized();
    tracing::debug!(
        bucket = %bucket,
        north = bounds.north,
        south = bounds.south,
        east = bounds.east,
        west = bounds.west,
        "scanning area"
    );
    let result = shared.client.scan_area(bounds).await;

    let event = {
        let mut session = lock(&shared.session);
        session.in_flight.remove(&bucket);

        let event = match result {
            Ok(candidates) => {
                let found = candidates.len();
                let added = session.known.merge_and_append(
                    retain_valid(candidates),
                    shared.config.dedup_radius_meters,
                );
                session.scanned.mark_scanned(bucket.clone());
                tracing::info!(
                    bucket = %bucket,
                    found,
                    added = added.len(),
                    total = session.known.len(),
                    "area scan complete"
                );
                ScanEvent::Completed { bucket, added }
            }
            Err(err) => {
                tracing::warn!(
                    bucket = %bucket,
                    error = %err,
                    "area scan failed, area stays eligible for retry"
                );
                ScanEvent::Failed {
                    bucket,
                    error: err.to_string(),
                }
            }
        };

        if session.in_flight.is_empty() {
            shared.scanning_tx.send_replace(false);
        }
        event
    };

    let _ = shared.events_tx.send(event);
}

/// Drop records no validated source should produce: blank ids or
/// coordinates off the globe.
fn retain_valid(candidates: Vec<Stadium>) -> Vec<Stadium> {
    candidates
        .into_iter()
        .filter(|s| {
            let ok = !s.id.trim().is_empty() && s.coordinates.is_valid();
            if !ok {
                tracing::debug!(id = %s.id, "dropping invalid discovered stadium");
            }
            ok
        })
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
