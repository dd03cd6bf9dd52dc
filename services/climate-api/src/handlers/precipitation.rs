//! Precipitation endpoint (CHIRPS daily mean).

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::Response,
};
use metrics::counter;
use serde::Deserialize;

use atlas_common::AtlasError;
use hex_engine::{assembler, CoverageRequest};

use crate::datasets;
use crate::handlers::common;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PrecipitationParams {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,

    /// H3 resolution (4-10).
    pub resolution: Option<u8>,
}

/// GET /api/climate/precipitation-drought
///
/// Mean precipitation in mm/day over the reference window. Cells with no
/// coverage are excluded, never interpolated; the count of exclusions is
/// reported in the metadata.
pub async fn precipitation_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PrecipitationParams>,
) -> Response {
    counter!("climate_requests_total", "dataset" => "precipitation").increment(1);

    let bounds = match common::parse_bounds(params.north, params.south, params.east, params.west) {
        Ok(b) => b,
        Err(e) => return common::error_response(&e),
    };
    let resolution = match common::parse_resolution(params.resolution, 7, 4, 10) {
        Ok(r) => r,
        Err(e) => return common::error_response(&e),
    };

    let request = CoverageRequest { bounds, resolution };
    let spec = datasets::precipitation();

    let result = state
        .engine
        .execute(&request, &spec, |bound, props| {
            props.insert(
                "precipMmPerDay".to_string(),
                assembler::round2(bound.value).into(),
            );
        })
        .await;

    match result {
        Ok(mut fc) => {
            fc.metadata
                .params
                .insert("unit".to_string(), "mm/day".into());
            common::ok_envelope(fc)
        }
        Err(AtlasError::NoDataInRegion) => common::empty_collection(
            &spec.source,
            resolution,
            state.engine.reducer().provenance() == hex_engine::DataProvenance::Real,
        ),
        Err(e) => common::error_response(&e),
    }
}
