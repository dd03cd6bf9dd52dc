//! Temperature projection endpoint (NASA NEX-GDDP-CMIP6).

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::Response,
};
use metrics::counter;
use serde::Deserialize;

use atlas_common::AtlasError;
use hex_engine::{assembler, CoverageRequest};

use crate::datasets::{self, BASELINE_TEMP_C, DEFAULT_MODEL};
use crate::handlers::common;
use crate::state::AppState;

/// Query parameters for the temperature projection endpoint.
#[derive(Debug, Deserialize)]
pub struct TemperatureParams {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,

    /// Projection year (2020-2100).
    pub year: Option<i32>,

    /// Climate scenario (rcp26, rcp45, rcp85).
    pub scenario: Option<String>,

    /// H3 resolution (1-10).
    pub resolution: Option<u8>,
}

/// GET /api/climate/temperature-projection
///
/// Hexagonal temperature anomalies relative to the 1986-2005 baseline.
pub async fn temperature_projection_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<TemperatureParams>,
) -> Response {
    counter!("climate_requests_total", "dataset" => "temperature_projection").increment(1);

    let bounds = match common::parse_bounds(params.north, params.south, params.east, params.west) {
        Ok(b) => b,
        Err(e) => return common::error_response(&e),
    };
    let year = match common::validate_year(params.year.unwrap_or(2050), 2020, 2100) {
        Ok(y) => y,
        Err(e) => return common::error_response(&e),
    };
    let scenario = params.scenario.unwrap_or_else(|| "rcp45".to_string());
    let Some(ssp_scenario) = datasets::map_scenario(&scenario) else {
        return common::error_response(&AtlasError::InvalidParameter {
            param: "scenario".to_string(),
            message: "must be one of: rcp26, rcp45, rcp85".to_string(),
        });
    };
    let resolution = match common::parse_resolution(params.resolution, 7, 1, 10) {
        Ok(r) => r,
        Err(e) => return common::error_response(&e),
    };

    tracing::info!(
        %scenario, ssp_scenario, year, resolution = resolution.level(),
        "temperature projection request"
    );

    let request = CoverageRequest { bounds, resolution };
    let spec = datasets::temperature_projection(year, ssp_scenario);

    let result = state
        .engine
        .execute(&request, &spec, |bound, props| {
            let anomaly = bound.value;
            props.insert("tempAnomaly".to_string(), assembler::round2(anomaly).into());
            props.insert(
                "tempAnomalyF".to_string(),
                assembler::round2(anomaly * 1.8).into(),
            );
            props.insert(
                "projected".to_string(),
                assembler::round2(BASELINE_TEMP_C + anomaly).into(),
            );
            props.insert("scenario".to_string(), scenario.as_str().into());
            props.insert("year".to_string(), year.into());
        })
        .await;

    match result {
        Ok(mut fc) => {
            let params = &mut fc.metadata.params;
            params.insert("model".to_string(), DEFAULT_MODEL.into());
            params.insert("scenario".to_string(), scenario.as_str().into());
            params.insert("sspScenario".to_string(), ssp_scenario.into());
            params.insert("year".to_string(), year.into());
            params.insert("baselineTemp".to_string(), BASELINE_TEMP_C.into());
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
