use std::future::Future;
use std::sync::Arc;

use stadiumap_core::{Bounds, Stadium};

use crate::error::DiscoveryError;

/// Source of stadiums inside a bounding box.
///
/// Implementations return already-validated stadiums. An empty answer and
/// "nothing found" are the same thing; `Err` means the area should be tried
/// again later.
pub trait DiscoveryClient: Send + Sync + 'static {
    fn scan_area(
        &self,
        bounds: Bounds,
    ) -> impl Future<Output = Result<Vec<Stadium>, DiscoveryError>> + Send;
}

impl<T: DiscoveryClient> DiscoveryClient for Arc<T> {
    fn scan_area(
        &self,
        bounds: Bounds,
    ) -> impl Future<Output = Result<Vec<Stadium>, DiscoveryError>> + Send {
        (**self).scan_area(bounds)
    }
}
