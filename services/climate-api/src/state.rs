//! Application state for the climate API.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use atlas_common::AtlasResult;
use hex_engine::{HexCoverageEngine, RegionReducer};
use reducer_client::{PlatformReducer, ReducerConfig, ReducerMode, SyntheticReducer};

use crate::tile_cache::TileUrlCache;

/// Shared application state.
///
/// The reducer client is constructed exactly once here and injected into
/// the engine; dataset handlers never re-initialize platform access.
pub struct AppState {
    /// Coverage engine around the process-wide reducer.
    pub engine: HexCoverageEngine,

    /// Platform client for visualization tile URLs. `None` in synthetic
    /// mode, where tile endpoints answer 503 instead of faking tiles.
    pub tiles: Option<Arc<PlatformReducer>>,

    /// Memoized visualization tile URLs.
    pub tile_cache: TileUrlCache,

    /// Which reducer implementation this process runs with.
    pub mode: ReducerMode,

    /// Prometheus render handle for the /metrics endpoint.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Build state from environment configuration.
    pub fn from_env(metrics: PrometheusHandle) -> AtlasResult<Self> {
        let config = ReducerConfig::from_env();

        match config.mode {
            ReducerMode::Platform => {
                let platform = Arc::new(PlatformReducer::new(&config)?);
                tracing::info!(endpoint = %config.endpoint, "using platform reducer");
                Ok(Self::new(
                    platform.clone(),
                    Some(platform),
                    ReducerMode::Platform,
                    metrics,
                ))
            }
            ReducerMode::Synthetic => {
                tracing::warn!("using synthetic reducer; responses will not carry real data");
                Ok(Self::new(
                    Arc::new(SyntheticReducer::kelvin_field()),
                    None,
                    ReducerMode::Synthetic,
                    metrics,
                ))
            }
        }
    }

    /// Assemble state from explicit parts (used directly by tests).
    pub fn new(
        reducer: Arc<dyn RegionReducer>,
        tiles: Option<Arc<PlatformReducer>>,
        mode: ReducerMode,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            engine: HexCoverageEngine::new(reducer),
            tiles,
            tile_cache: TileUrlCache::new(),
            mode,
            metrics,
        }
    }
}
