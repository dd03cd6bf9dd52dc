//! Visualization tile URL endpoints.
//!
//! Tiles are rendered by the analysis platform; this layer only memoizes
//! the URL templates per (dataset, year, season, color scheme). In
//! synthetic mode there is no platform to render tiles, so these endpoints
//! answer 503 rather than fabricating URLs.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde::Deserialize;

use atlas_common::AtlasError;
use atlas_protocol::DataEnvelope;
use reducer_client::{PlatformReducer, TileSpec, TileUrlInfo};

use crate::datasets::{self, DEFAULT_MODEL};
use crate::handlers::common;
use crate::state::AppState;
use crate::tile_cache::TileKey;

// Color ramps, ordered cold to hot / dry to wet.
const ANOMALY_PALETTE: [&str; 12] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026", "#7f1d1d",
];
const HEAT_PALETTE: [&str; 9] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];
const URBAN_PALETTE: [&str; 9] = [
    "#f7fcf0", "#e0f3db", "#ccebc5", "#a8ddb5", "#7bccc4", "#4eb3d3", "#2b8cbe", "#0868ac",
    "#084081",
];
const TEMPERATURE_PALETTE: [&str; 11] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];
const RED_BLUE_PALETTE: [&str; 7] = [
    "#b2182b", "#ef8a62", "#fddbc7", "#f7f7f7", "#d1e5f0", "#67a9cf", "#2166ac",
];
const PRECIP_PALETTE: [&str; 7] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c",
];

#[derive(Debug, Deserialize)]
pub struct TileParams {
    pub year: Option<i32>,
    pub season: Option<String>,
    pub scenario: Option<String>,
    pub color_scheme: Option<String>,
}

/// GET /api/climate/temperature-projection/tiles
pub async fn temperature_tiles_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<TileParams>,
) -> Response {
    counter!("climate_tile_requests_total", "dataset" => "temperature_projection").increment(1);

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

    let key = TileKey {
        dataset: "temperature_projection",
        year,
        season: "annual".to_string(),
        color_scheme: scenario.clone(),
    };
    let spec = TileSpec {
        collection: "NASA/GDDP-CMIP6".to_string(),
        band: "tasmax".to_string(),
        date_range: Some((format!("{year}-01-01"), format!("{year}-12-31"))),
        filters: vec![
            ("model".to_string(), DEFAULT_MODEL.to_string()),
            ("scenario".to_string(), ssp_scenario.to_string()),
        ],
        min: -1.0,
        max: 12.0,
        palette: ANOMALY_PALETTE.iter().map(|s| s.to_string()).collect(),
    };

    serve_tile(&state, key, spec).await
}

/// GET /api/climate/urban-heat-island/tiles
pub async fn heat_island_tiles_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<TileParams>,
) -> Response {
    counter!("climate_tile_requests_total", "dataset" => "urban_heat_island").increment(1);

    let scheme = params
        .color_scheme
        .unwrap_or_else(|| "temperature".to_string());
    let palette: Vec<String> = match scheme.as_str() {
        "heat" => HEAT_PALETTE.iter().map(|s| s.to_string()).collect(),
        "urban" => URBAN_PALETTE.iter().map(|s| s.to_string()).collect(),
        "temperature" => TEMPERATURE_PALETTE.iter().map(|s| s.to_string()).collect(),
        _ => {
            return common::error_response(&AtlasError::InvalidParameter {
                param: "color_scheme".to_string(),
                message: "must be one of: temperature, heat, urban".to_string(),
            })
        }
    };

    let key = TileKey {
        dataset: "urban_heat_island",
        year: 0,
        season: params.season.unwrap_or_else(|| "summer".to_string()),
        color_scheme: scheme,
    };
    let spec = TileSpec {
        collection: "YALE/YCEO/UHI/Summer_UHI_yearly_pixel/v4".to_string(),
        band: "Nighttime".to_string(),
        date_range: None,
        filters: Vec::new(),
        min: -1.5,
        max: 7.5,
        palette,
    };

    serve_tile(&state, key, spec).await
}

/// GET /api/climate/groundwater/tiles
pub async fn groundwater_tiles_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<TileParams>,
) -> Response {
    counter!("climate_tile_requests_total", "dataset" => "groundwater").increment(1);

    let year = match common::validate_year(params.year.unwrap_or(2017), 2002, 2024) {
        Ok(y) => y,
        Err(e) => return common::error_response(&e),
    };
    let season = params.season.unwrap_or_else(|| "annual".to_string());
    let date_range = match season.as_str() {
        "spring" => (format!("{year}-03-01"), format!("{year}-05-31")),
        "summer" => (format!("{year}-06-01"), format!("{year}-08-31")),
        "autumn" => (format!("{year}-09-01"), format!("{year}-11-30")),
        "winter" => (format!("{year}-12-01"), format!("{}-02-28", year + 1)),
        "annual" => (format!("{year}-01-01"), format!("{year}-12-31")),
        _ => {
            return common::error_response(&AtlasError::InvalidParameter {
                param: "season".to_string(),
                message: "must be one of: spring, summer, autumn, winter, annual".to_string(),
            })
        }
    };

    let key = TileKey {
        dataset: "groundwater",
        year,
        season,
        color_scheme: "red_blue".to_string(),
    };
    let spec = TileSpec {
        collection: "NASA/GRACE/MASS_GRIDS_V04/MASCON_CRI".to_string(),
        band: "lwe_thickness".to_string(),
        date_range: Some(date_range),
        filters: Vec::new(),
        min: -20.0,
        max: 20.0,
        palette: RED_BLUE_PALETTE.iter().map(|s| s.to_string()).collect(),
    };

    serve_tile(&state, key, spec).await
}

/// GET /api/climate/precipitation-drought/tiles
pub async fn precipitation_tiles_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(_params): Query<TileParams>,
) -> Response {
    counter!("climate_tile_requests_total", "dataset" => "precipitation").increment(1);

    let key = TileKey {
        dataset: "precipitation",
        year: 0,
        season: "reference".to_string(),
        color_scheme: "blues".to_string(),
    };
    let spec = TileSpec {
        collection: "UCSB-CHG/CHIRPS/DAILY".to_string(),
        band: "precipitation".to_string(),
        date_range: Some(("2020-01-01".to_string(), "2023-12-31".to_string())),
        filters: Vec::new(),
        min: 0.0,
        max: 10.0,
        palette: PRECIP_PALETTE.iter().map(|s| s.to_string()).collect(),
    };

    serve_tile(&state, key, spec).await
}

/// Memoized fetch of a tile URL through the platform client.
async fn serve_tile(state: &AppState, key: TileKey, spec: TileSpec) -> Response {
    let Some(platform) = &state.tiles else {
        return common::error_response(&AtlasError::ReducerUnavailable(
            "tile rendering requires the platform reducer".to_string(),
        ));
    };

    if let Some(cached) = state.tile_cache.get(&key).await {
        counter!("climate_tile_cache_hits_total").increment(1);
        return tile_response(cached);
    }

    match fetch_tile(platform, &spec).await {
        Ok(info) => {
            let kept = state.tile_cache.insert(key, info).await;
            tile_response(kept)
        }
        Err(e) => common::error_response(&e),
    }
}

async fn fetch_tile(platform: &PlatformReducer, spec: &TileSpec) -> Result<TileUrlInfo, AtlasError> {
    platform
        .visualization_tile_url(spec)
        .await
        .map_err(AtlasError::Reducer)
}

fn tile_response(info: TileUrlInfo) -> Response {
    (StatusCode::OK, Json(DataEnvelope::new(info))).into_response()
}
