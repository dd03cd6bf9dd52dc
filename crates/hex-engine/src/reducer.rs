//! The Region Reducer contract.
//!
//! The engine's only external dependency: something that can reduce a raster
//! band to a mean scalar over a batch of polygons in one round trip. The real
//! system binds this to a cloud geospatial-analysis platform; tests bind it
//! to a double; local development may bind it to an explicitly configured
//! synthetic source.

use async_trait::async_trait;

use atlas_common::ReducerError;
use atlas_protocol::Ring;

/// Where a reducer's values come from. Drives the `isRealData` response
/// flag, so implementations must answer truthfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvenance {
    /// Values observed from the real analysis platform.
    Real,
    /// Deterministic synthetic values for local development.
    Synthetic,
}

/// Selects the raster to reduce against.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSelector {
    /// Image collection identifier on the analysis platform.
    pub collection: String,

    /// Band to reduce.
    pub band: String,

    /// Reduction scale in meters (the dataset's native resolution).
    pub scale_meters: f64,

    /// Optional ISO-8601 date range filter (start, end), inclusive.
    pub date_range: Option<(String, String)>,

    /// Property equality filters (e.g. model, scenario).
    pub filters: Vec<(String, String)>,
}

impl RasterSelector {
    /// Select `band` of `collection` at a 1 km default scale.
    pub fn new(collection: impl Into<String>, band: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            band: band.into(),
            scale_meters: 1000.0,
            date_range: None,
            filters: Vec::new(),
        }
    }

    /// Set the reduction scale in meters.
    pub fn at_scale_meters(mut self, scale_meters: f64) -> Self {
        self.scale_meters = scale_meters;
        self
    }

    /// Restrict to an inclusive ISO-8601 date range.
    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.date_range = Some((start.into(), end.into()));
        self
    }

    /// Add a property equality filter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

/// An external service that reduces raster data over polygon regions.
///
/// `reduce_mean` is batched by contract: one invocation covers the whole
/// cell set, because per-cell round trips dominate latency at thousand-cell
/// counts. The returned vector is aligned with `regions`; `None` means the
/// raster has no data for that region (ocean, outside dataset coverage).
#[async_trait]
pub trait RegionReducer: Send + Sync {
    /// Reduce `selector`'s raster to its mean over each region.
    async fn reduce_mean(
        &self,
        regions: &[Ring],
        selector: &RasterSelector,
    ) -> Result<Vec<Option<f64>>, ReducerError>;

    /// Whether values are observed or synthetic.
    fn provenance(&self) -> DataProvenance;

    /// Attribution string for response metadata.
    fn describe(&self) -> String;
}
