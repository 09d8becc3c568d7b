//! Viewport-driven stadium discovery.
//!
//! Watches map viewport changes, debounces them, queries a
//! [`DiscoveryClient`] for stadiums inside the settled view, and merges the
//! answers into the session's known collection after dropping exact-id and
//! geographic duplicates. Also decides which known stadiums are worth
//! rendering at a given zoom.

pub mod area_cache;
pub mod client;
pub mod collection;
pub mod controller;
pub mod dedup;
pub mod error;
pub mod lod;

pub use area_cache::{bucket_key, ScannedAreas};
pub use client::DiscoveryClient;
pub use collection::KnownStadiums;
pub use controller::{
    viewport_bucket, ScanConfig, ScanEvent, ScanState, SkipReason, ViewportScanController,
};
pub use dedup::{merge, merge_within, DEDUP_RADIUS_METERS};
pub use error::DiscoveryError;
pub use lod::{select, select_with_min_zoom, MIN_DETAIL_ZOOM};
