//! Groundwater depletion endpoint (GRACE liquid water equivalent).
//!
//! Unlike the single-raster endpoints this one composes the engine stages
//! directly: two batched reductions over the same cell set (baseline and
//! recent GRACE windows) are merged into a per-cell storage trend.

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

use crate::datasets::{self, GRACE_BASELINE, GRACE_RECENT, GRACE_WINDOW_GAP_YEARS};
use crate::handlers::common;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GroundwaterParams {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,

    /// H3 resolution (4-8). GRACE is ~111 km native, so fine resolutions
    /// only oversample the same mascon cell.
    pub resolution: Option<u8>,
}

/// GET /api/climate/groundwater
pub async fn groundwater_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<GroundwaterParams>,
) -> Response {
    counter!("climate_requests_total", "dataset" => "groundwater").increment(1);

    let bounds = match common::parse_bounds(params.north, params.south, params.east, params.west) {
        Ok(b) => b,
        Err(e) => return common::error_response(&e),
    };
    let resolution = match common::parse_resolution(params.resolution, 6, 4, 8) {
        Ok(r) => r,
        Err(e) => return common::error_response(&e),
    };

    match groundwater_coverage(&state, bounds, resolution).await {
        Ok(fc) => common::ok_envelope(fc),
        Err(AtlasError::NoDataInRegion) => common::empty_collection(
            "NASA GRACE via analysis platform",
            resolution,
            state.engine.reducer().provenance() == DataProvenance::Real,
        ),
        Err(e) => common::error_response(&e),
    }
}

async fn groundwater_coverage(
    state: &AppState,
    bounds: GeoBounds,
    resolution: CellResolution,
) -> AtlasResult<HexFeatureCollection> {
    let recent_spec = datasets::groundwater_lwe(GRACE_RECENT.0, GRACE_RECENT.1);
    let baseline_spec = datasets::groundwater_lwe(GRACE_BASELINE.0, GRACE_BASELINE.1);

    governor::estimate_and_validate(&bounds, resolution, recent_spec.max_cells)?;
    let cells = grid::generate_cells(&bounds, resolution, recent_spec.buffer_fraction)?;

    let reducer = state.engine.reducer().as_ref();
    let recent = binder::bind(
        &cells,
        reducer,
        &recent_spec.selector,
        recent_spec.policy,
        None,
    )
    .await?;
    let baseline = binder::bind(
        &cells,
        reducer,
        &baseline_spec.selector,
        baseline_spec.policy,
        None,
    )
    .await?;

    // Merge: a cell contributes only when both windows resolved it.
    let baseline_by_cell: HashMap<CellIndex, f64> = baseline
        .cells
        .iter()
        .map(|bc| (bc.cell, bc.value))
        .collect();

    let merged: Vec<BoundCell> = recent
        .cells
        .iter()
        .filter_map(|bc| {
            baseline_by_cell.get(&bc.cell).map(|&base| BoundCell {
                cell: bc.cell,
                value: (bc.value - base) / GRACE_WINDOW_GAP_YEARS,
                interpolated: bc.interpolated,
            })
        })
        .collect();

    if merged.is_empty() {
        return Err(AtlasError::NoDataInRegion);
    }

    let mut metadata = CollectionMetadata::new(
        &recent_spec.source,
        resolution.level(),
        state.engine.reducer().provenance() == DataProvenance::Real,
    );
    metadata.missing_cells = recent.generated - merged.len();
    metadata.params.insert(
        "temporalCoverage".to_string(),
        format!("{} to {}", GRACE_BASELINE.0, GRACE_RECENT.1).into(),
    );
    metadata.params.insert(
        "unit".to_string(),
        "cm/year (Liquid Water Equivalent trend)".into(),
    );

    Ok(assembler::to_feature_collection(
        &merged,
        metadata,
        |bound, props| {
            let trend = bound.value;
            props.insert(
                "trendCmPerYear".to_string(),
                assembler::round2(trend).into(),
            );
            props.insert(
                "totalChangeCm".to_string(),
                assembler::round2(trend * GRACE_WINDOW_GAP_YEARS).into(),
            );
            props.insert(
                "status".to_string(),
                datasets::classify_depletion(trend).into(),
            );
        },
    ))
}
