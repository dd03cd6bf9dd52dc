//! Wet-bulb temperature endpoint (CMIP6 tasmax + hurs, Stull approximation).

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::Response,
};
use metrics::counter;
use serde::Deserialize;

use atlas_common::{AtlasError, AtlasResult, CellResolution, GeoBounds};
use atlas_protocol::{CollectionMetadata, HexFeatureCollection};
use h3o::CellIndex;
use hex_engine::{assembler, binder, governor, grid, BoundCell, DataProvenance};

use crate::datasets::{self, KELVIN_OFFSET};
use crate::handlers::common;
use crate::state::AppState;
use crate::wet_bulb::{classify_danger, stull_wet_bulb};

const SUPPORTED_SCENARIOS: [&str; 3] = ["ssp126", "ssp245", "ssp585"];

#[derive(Debug, Deserialize)]
pub struct WetBulbParams {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,

    /// Projection year (2025-2100).
    pub year: Option<i32>,

    /// SSP scenario (ssp126, ssp245, ssp585).
    pub scenario: Option<String>,

    /// H3 resolution (1-9).
    pub resolution: Option<u8>,
}

/// GET /api/climate/wet-bulb
///
/// Summer wet-bulb temperature combining two reductions over the same cell
/// set: maximum temperature (tasmax, Kelvin) and relative humidity (hurs,
/// percent), fed through the Stull closed form per cell.
pub async fn wet_bulb_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<WetBulbParams>,
) -> Response {
    counter!("climate_requests_total", "dataset" => "wet_bulb").increment(1);

    let bounds = match common::parse_bounds(params.north, params.south, params.east, params.west) {
        Ok(b) => b,
        Err(e) => return common::error_response(&e),
    };
    let year = match common::validate_year(params.year.unwrap_or(2025), 2025, 2100) {
        Ok(y) => y,
        Err(e) => return common::error_response(&e),
    };
    let scenario = params.scenario.unwrap_or_else(|| "ssp245".to_string());
    if !SUPPORTED_SCENARIOS.contains(&scenario.as_str()) {
        return common::error_response(&AtlasError::InvalidParameter {
            param: "scenario".to_string(),
            message: "must be one of: ssp126, ssp245, ssp585".to_string(),
        });
    }
    let resolution = match common::parse_resolution(params.resolution, 4, 1, 9) {
        Ok(r) => r,
        Err(e) => return common::error_response(&e),
    };

    match wet_bulb_coverage(&state, bounds, resolution, year, &scenario).await {
        Ok(fc) => common::ok_envelope(fc),
        Err(AtlasError::NoDataInRegion) => common::empty_collection(
            "NASA NEX-GDDP-CMIP6",
            resolution,
            state.engine.reducer().provenance() == DataProvenance::Real,
        ),
        Err(e) => common::error_response(&e),
    }
}

async fn wet_bulb_coverage(
    state: &AppState,
    bounds: GeoBounds,
    resolution: CellResolution,
    year: i32,
    scenario: &str,
) -> AtlasResult<HexFeatureCollection> {
    let temp_spec = datasets::cmip6_summer_band("tasmax", year, scenario);
    let humidity_spec = datasets::cmip6_summer_band("hurs", year, scenario);

    governor::estimate_and_validate(&bounds, resolution, temp_spec.max_cells)?;
    let cells = grid::generate_cells(&bounds, resolution, 0.0)?;

    let reducer = state.engine.reducer().as_ref();
    let temps = binder::bind(
        &cells,
        reducer,
        &temp_spec.selector,
        temp_spec.policy,
        Some(|kelvin| kelvin - KELVIN_OFFSET),
    )
    .await?;
    let humidity = binder::bind(
        &cells,
        reducer,
        &humidity_spec.selector,
        humidity_spec.policy,
        None,
    )
    .await?;

    // A cell needs both inputs; the Stull form runs per merged cell.
    let humidity_by_cell: HashMap<CellIndex, f64> = humidity
        .cells
        .iter()
        .map(|bc| (bc.cell, bc.value))
        .collect();

    let merged: Vec<BoundCell> = temps
        .cells
        .iter()
        .filter_map(|bc| {
            humidity_by_cell.get(&bc.cell).map(|&rh| BoundCell {
                cell: bc.cell,
                value: stull_wet_bulb(bc.value, rh.clamp(0.0, 100.0)),
                interpolated: bc.interpolated,
            })
        })
        .collect();

    if merged.is_empty() {
        return Err(AtlasError::NoDataInRegion);
    }

    let mut metadata = CollectionMetadata::new(
        "NASA NEX-GDDP-CMIP6 (tasmax + hurs, Stull wet bulb)",
        resolution.level(),
        state.engine.reducer().provenance() == DataProvenance::Real,
    );
    metadata.missing_cells = temps.generated - merged.len();
    metadata
        .params
        .insert("year".to_string(), year.into());
    metadata
        .params
        .insert("scenario".to_string(), scenario.into());
    metadata.params.insert(
        "generatedAt".to_string(),
        chrono::Utc::now().to_rfc3339().into(),
    );

    Ok(assembler::to_feature_collection(
        &merged,
        metadata,
        |bound, props| {
            let wbt = bound.value;
            props.insert("wetBulbC".to_string(), assembler::round2(wbt).into());
            props.insert(
                "wetBulbF".to_string(),
                assembler::round2(wbt * 9.0 / 5.0 + 32.0).into(),
            );
            props.insert("dangerLevel".to_string(), classify_danger(wbt).into());
            props.insert("year".to_string(), year.into());
            props.insert("scenario".to_string(), scenario.into());
        },
    ))
}
