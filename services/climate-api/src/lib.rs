//! Climate dataset HTTP API.
//!
//! Serves hexagonal GeoJSON coverages of climate datasets (temperature
//! projections, precipitation, urban heat island, groundwater, wet-bulb
//! temperature) for a mapping front end. All raster math happens on the
//! remote analysis platform through the injected Region Reducer; this
//! service validates parameters, drives the coverage engine, and shapes
//! responses.

pub mod datasets;
pub mod handlers;
pub mod state;
pub mod tile_cache;
pub mod wet_bulb;
