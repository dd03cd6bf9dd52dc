//! Hexagonal coverage engine.
//!
//! Produces a complete, bounded set of H3 cells covering a geographic
//! rectangle, binds each cell to a scalar obtained from an external
//! [`RegionReducer`], and assembles the result into a GeoJSON
//! FeatureCollection. Dataset modules stay thin: they supply a
//! [`DatasetSpec`] (raster selector, unit conversion, completeness policy)
//! instead of reimplementing tessellation.
//!
//! Pipeline, per request:
//!
//! ```text
//! bounds + resolution
//!        │
//!        ▼
//! governor::estimate_and_validate     (pure, rejects oversize viewports)
//!        │
//!        ▼
//! grid::generate_cells                (polygon tessellation, dense-grid fallback)
//!        │
//!        ▼
//! binder::bind                        (one batched reduce, completeness policy)
//!        │
//!        ▼
//! assembler::to_feature_collection    ([lon, lat] closed rings, metadata)
//! ```
//!
//! The engine knows nothing about the concrete reduction backend beyond the
//! [`RegionReducer`] contract, so it can run against the real analysis
//! platform, a local raster store, or a test double.

pub mod assembler;
pub mod binder;
pub mod engine;
pub mod governor;
pub mod grid;
pub mod policy;
pub mod reducer;

pub use binder::{BindOutcome, BoundCell};
pub use engine::{CoverageRequest, DatasetSpec, HexCoverageEngine};
pub use governor::{CellEstimate, DEFAULT_MAX_CELLS};
pub use grid::{cell_center, cell_ring, DENSE_GRID_STEP_FRACTION};
pub use policy::CompletenessPolicy;
pub use reducer::{DataProvenance, RasterSelector, RegionReducer};
