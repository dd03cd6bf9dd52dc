//! High-level coverage engine.
//!
//! The `HexCoverageEngine` wires the pipeline stages together around an
//! injected [`RegionReducer`]. Dataset modules configure it with a
//! [`DatasetSpec`] instead of reimplementing tessellation, governance, or
//! binding.
//!
//! # Example
//!
//! ```rust,ignore
//! use hex_engine::{CoverageRequest, DatasetSpec, HexCoverageEngine, RasterSelector};
//!
//! // Create the engine once at startup around the process-wide reducer.
//! let engine = HexCoverageEngine::new(reducer);
//!
//! let spec = DatasetSpec::new(
//!     "NASA NEX-GDDP-CMIP6",
//!     RasterSelector::new("NASA/GDDP-CMIP6", "tasmax").at_scale_meters(27_830.0),
//! )
//! .with_convert(|kelvin| kelvin - 273.15);
//!
//! let fc = engine.execute(&request, &spec, |bound, props| {
//!     props.insert("tempC".into(), bound.value.into());
//! }).await?;
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use atlas_common::{AtlasResult, CellResolution, GeoBounds};
use atlas_protocol::{CollectionMetadata, HexFeatureCollection};

use crate::assembler;
use crate::binder::{self, BoundCell};
use crate::governor::{self, DEFAULT_MAX_CELLS};
use crate::grid;
use crate::policy::CompletenessPolicy;
use crate::reducer::{DataProvenance, RasterSelector, RegionReducer};

/// A validated coverage request: viewport plus cell resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageRequest {
    pub bounds: GeoBounds,
    pub resolution: CellResolution,
}

/// Per-dataset configuration for the engine.
///
/// This is the whole of what a dataset module has to provide: everything
/// else (tessellation, governance, binding, assembly) is shared.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    /// Source attribution for response metadata.
    pub source: String,

    /// Raster selection on the analysis platform.
    pub selector: RasterSelector,

    /// Missing-data handling.
    pub policy: CompletenessPolicy,

    /// Outward bounds buffering as a fraction of each span (0.0 for none).
    pub buffer_fraction: f64,

    /// Cell ceiling for the governor.
    pub max_cells: u64,

    /// Unit conversion applied to present values before interpolation.
    /// Must be affine so that interpolation commutes with it.
    pub convert: Option<fn(f64) -> f64>,
}

impl DatasetSpec {
    pub fn new(source: impl Into<String>, selector: RasterSelector) -> Self {
        Self {
            source: source.into(),
            selector,
            policy: CompletenessPolicy::Exclude,
            buffer_fraction: 0.0,
            max_cells: DEFAULT_MAX_CELLS,
            convert: None,
        }
    }

    pub fn with_policy(mut self, policy: CompletenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_buffer_fraction(mut self, fraction: f64) -> Self {
        self.buffer_fraction = fraction;
        self
    }

    pub fn with_max_cells(mut self, max_cells: u64) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn with_convert(mut self, convert: fn(f64) -> f64) -> Self {
        self.convert = Some(convert);
        self
    }
}

/// The hexagonal coverage engine.
///
/// Holds the process-wide reducer; construct once at startup and share.
pub struct HexCoverageEngine {
    reducer: Arc<dyn RegionReducer>,
}

impl HexCoverageEngine {
    pub fn new(reducer: Arc<dyn RegionReducer>) -> Self {
        Self { reducer }
    }

    /// The reducer this engine binds against.
    pub fn reducer(&self) -> &Arc<dyn RegionReducer> {
        &self.reducer
    }

    /// Run the full pipeline for one request.
    ///
    /// `decorate` adds dataset-specific feature properties (value keys,
    /// classification, echoed request parameters). Validation failures never
    /// reach the generator or binder; reducer failures propagate unmodified.
    pub async fn execute<F>(
        &self,
        request: &CoverageRequest,
        spec: &DatasetSpec,
        decorate: F,
    ) -> AtlasResult<HexFeatureCollection>
    where
        F: Fn(&BoundCell, &mut Map<String, Value>),
    {
        let estimate =
            governor::estimate_and_validate(&request.bounds, request.resolution, spec.max_cells)?;

        let cells = grid::generate_cells(&request.bounds, request.resolution, spec.buffer_fraction)?;

        let outcome = match binder::bind(
            &cells,
            self.reducer.as_ref(),
            &spec.selector,
            spec.policy,
            spec.convert,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                if !matches!(err, atlas_common::AtlasError::NoDataInRegion) {
                    tracing::error!(
                        source = %spec.source,
                        bounds = ?request.bounds,
                        resolution = request.resolution.level(),
                        error = %err,
                        "coverage binding failed"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(
            source = %spec.source,
            estimated = estimate.estimated,
            generated = outcome.generated,
            bound = outcome.cells.len(),
            missing = outcome.missing,
            "assembled hexagonal coverage"
        );

        let mut metadata = CollectionMetadata::new(
            &spec.source,
            request.resolution.level(),
            self.reducer.provenance() == DataProvenance::Real,
        );
        metadata.missing_cells = outcome.missing;

        Ok(assembler::to_feature_collection(
            &outcome.cells,
            metadata,
            decorate,
        ))
    }
}
