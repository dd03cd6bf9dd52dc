//! Urban heat island endpoint (Yale YCEO).

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
pub struct HeatIslandParams {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,

    /// H3 resolution (4-12).
    pub resolution: Option<u8>,
}

/// GET /api/climate/urban-heat-island
///
/// Nighttime surface heat island intensity (°C) with a severity level per
/// cell. The UHI raster is sparse outside built-up areas, so gaps are
/// filled from resolved neighbors to keep the surface continuous.
pub async fn heat_island_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HeatIslandParams>,
) -> Response {
    counter!("climate_requests_total", "dataset" => "urban_heat_island").increment(1);

    let bounds = match common::parse_bounds(params.north, params.south, params.east, params.west) {
        Ok(b) => b,
        Err(e) => return common::error_response(&e),
    };
    let resolution = match common::parse_resolution(params.resolution, 8, 4, 12) {
        Ok(r) => r,
        Err(e) => return common::error_response(&e),
    };

    let request = CoverageRequest { bounds, resolution };
    let spec = datasets::urban_heat_island();

    let result = state
        .engine
        .execute(&request, &spec, |bound, props| {
            props.insert(
                "heatIslandIntensity".to_string(),
                assembler::round2(bound.value).into(),
            );
            props.insert(
                "level".to_string(),
                datasets::classify_heat_island(bound.value).into(),
            );
        })
        .await;

    match result {
        Ok(mut fc) => {
            let params = &mut fc.metadata.params;
            params.insert("temporalCoverage".to_string(), "2003-2018".into());
            params.insert(
                "description".to_string(),
                "Nighttime surface urban heat island intensity (°C)".into(),
            );
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
