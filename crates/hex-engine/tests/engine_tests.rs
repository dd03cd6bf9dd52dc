//! End-to-end engine tests against a table-driven reducer double.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use h3o::{CellIndex, LatLng, Resolution};
use serde_json::Value;

use atlas_common::{AtlasError, CellResolution, GeoBounds, ReducerError};
use atlas_protocol::Ring;
use hex_engine::{
    grid, CompletenessPolicy, CoverageRequest, DataProvenance, DatasetSpec, HexCoverageEngine,
    RasterSelector, RegionReducer,
};

/// Reducer double: snaps each region's centroid back to its containing cell
/// and answers from a value table.
struct TableReducer {
    resolution: Resolution,
    values: HashMap<CellIndex, Option<f64>>,
    default: Option<f64>,
    provenance: DataProvenance,
}

impl TableReducer {
    fn uniform(resolution: Resolution, value: f64) -> Self {
        Self {
            resolution,
            values: HashMap::new(),
            default: Some(value),
            provenance: DataProvenance::Real,
        }
    }
}

#[async_trait]
impl RegionReducer for TableReducer {
    async fn reduce_mean(
        &self,
        regions: &[Ring],
        _selector: &RasterSelector,
    ) -> Result<Vec<Option<f64>>, ReducerError> {
        Ok(regions
            .iter()
            .map(|ring| {
                let n = (ring.len() - 1) as f64;
                let lon = ring[..ring.len() - 1].iter().map(|v| v[0]).sum::<f64>() / n;
                let lat = ring[..ring.len() - 1].iter().map(|v| v[1]).sum::<f64>() / n;
                let cell = LatLng::new(lat, lon).unwrap().to_cell(self.resolution);
                self.values.get(&cell).copied().unwrap_or(self.default)
            })
            .collect())
    }

    fn provenance(&self) -> DataProvenance {
        self.provenance
    }

    fn describe(&self) -> String {
        "table reducer".to_string()
    }
}

fn nyc_request() -> CoverageRequest {
    CoverageRequest {
        bounds: GeoBounds::new(41.0, 40.0, -73.0, -75.0).unwrap(),
        resolution: CellResolution::new(7).unwrap(),
    }
}

fn kelvin_spec(policy: CompletenessPolicy) -> DatasetSpec {
    DatasetSpec::new(
        "Test Temperature",
        RasterSelector::new("TEST/TEMP", "tasmax").at_scale_meters(27_830.0),
    )
    .with_policy(policy)
    .with_convert(|kelvin| kelvin - 273.15)
    // The 1° x 2° viewport estimates just over the production ceiling.
    .with_max_cells(6000)
}

fn decorate_temp(bound: &hex_engine::BoundCell, props: &mut serde_json::Map<String, Value>) {
    props.insert("tempC".to_string(), bound.value.into());
}

#[tokio::test]
async fn test_end_to_end_interpolate_fills_single_gap() {
    let request = nyc_request();
    let cells = grid::generate_cells(&request.bounds, request.resolution, 0.0).unwrap();

    // Fixed 300.0 K everywhere except one interior gap.
    let mut reducer = TableReducer::uniform(Resolution::Seven, 300.0);
    let cell_set: std::collections::BTreeSet<CellIndex> = cells.iter().copied().collect();
    let gap = *cells
        .iter()
        .find(|&&c| {
            // An interior cell: every ring-2 neighbor is part of the covering.
            c.grid_disk::<Vec<_>>(2).iter().all(|n| cell_set.contains(n))
        })
        .expect("covering has interior cells");
    reducer.values.insert(gap, None);

    let engine = HexCoverageEngine::new(Arc::new(reducer));
    let fc = engine
        .execute(
            &request,
            &kelvin_spec(CompletenessPolicy::interpolate()),
            decorate_temp,
        )
        .await
        .unwrap();

    // Under INTERPOLATE the gap is filled, so every generated cell appears.
    assert_eq!(fc.features.len(), cells.len());
    assert_eq!(fc.metadata.count, cells.len());
    assert_eq!(fc.metadata.missing_cells, 1);
    assert!(fc.metadata.is_real_data);

    // Every cell converts 300.0 K -> 26.85 °C; the gap interpolates to the
    // same value since all of its resolved neighbors read 300.0 K.
    for feature in &fc.features {
        let temp = feature.properties["tempC"].as_f64().unwrap();
        assert!(
            (temp - (300.0 - 273.15)).abs() < 1e-9,
            "cell {} read {}",
            feature.properties["hexId"],
            temp
        );
    }
}

#[tokio::test]
async fn test_end_to_end_exclude_drops_gaps_and_counts_them() {
    let request = nyc_request();
    let cells = grid::generate_cells(&request.bounds, request.resolution, 0.0).unwrap();

    let mut reducer = TableReducer::uniform(Resolution::Seven, 300.0);
    for &cell in cells.iter().take(5) {
        reducer.values.insert(cell, None);
    }

    let engine = HexCoverageEngine::new(Arc::new(reducer));
    let fc = engine
        .execute(
            &request,
            &kelvin_spec(CompletenessPolicy::Exclude),
            decorate_temp,
        )
        .await
        .unwrap();

    assert_eq!(fc.features.len(), cells.len() - 5);
    assert_eq!(fc.metadata.missing_cells, 5);

    let dropped: Vec<String> = cells.iter().take(5).map(|c| c.to_string()).collect();
    for feature in &fc.features {
        let id = feature.properties["hexId"].as_str().unwrap();
        assert!(!dropped.iter().any(|d| d == id));
    }
}

#[tokio::test]
async fn test_every_ring_is_closed_lon_lat() {
    let request = nyc_request();
    let reducer = TableReducer::uniform(Resolution::Seven, 300.0);
    let engine = HexCoverageEngine::new(Arc::new(reducer));

    let fc = engine
        .execute(
            &request,
            &kelvin_spec(CompletenessPolicy::Exclude),
            decorate_temp,
        )
        .await
        .unwrap();

    for feature in &fc.features {
        let ring = feature.geometry.exterior();
        assert_eq!(ring.first(), ring.last());
        for [lon, lat] in ring {
            // The NYC viewport: longitude is the large negative coordinate.
            assert!((-76.0..=-72.0).contains(lon));
            assert!((39.0..=42.0).contains(lat));
        }
    }
}

#[tokio::test]
async fn test_synthetic_provenance_never_sets_is_real_data() {
    let request = nyc_request();
    let mut reducer = TableReducer::uniform(Resolution::Seven, 300.0);
    reducer.provenance = DataProvenance::Synthetic;

    let engine = HexCoverageEngine::new(Arc::new(reducer));
    let fc = engine
        .execute(
            &request,
            &kelvin_spec(CompletenessPolicy::Exclude),
            decorate_temp,
        )
        .await
        .unwrap();

    assert!(!fc.metadata.is_real_data);
}

#[tokio::test]
async fn test_governor_runs_before_any_reducer_call() {
    struct PanicReducer;

    #[async_trait]
    impl RegionReducer for PanicReducer {
        async fn reduce_mean(
            &self,
            _regions: &[Ring],
            _selector: &RasterSelector,
        ) -> Result<Vec<Option<f64>>, ReducerError> {
            panic!("reducer must not be reached for an oversize viewport");
        }

        fn provenance(&self) -> DataProvenance {
            DataProvenance::Real
        }

        fn describe(&self) -> String {
            "panic".to_string()
        }
    }

    let request = CoverageRequest {
        bounds: GeoBounds::new(50.0, 0.0, 50.0, 0.0).unwrap(),
        resolution: CellResolution::new(7).unwrap(),
    };

    let engine = HexCoverageEngine::new(Arc::new(PanicReducer));
    let err = engine
        .execute(
            &request,
            &kelvin_spec(CompletenessPolicy::Exclude),
            decorate_temp,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AtlasError::BoundsTooLarge { .. }));
}

#[tokio::test]
async fn test_reducer_failure_propagates_unmodified() {
    struct FailingReducer;

    #[async_trait]
    impl RegionReducer for FailingReducer {
        async fn reduce_mean(
            &self,
            _regions: &[Ring],
            _selector: &RasterSelector,
        ) -> Result<Vec<Option<f64>>, ReducerError> {
            Err(ReducerError::Request("connection refused".to_string()))
        }

        fn provenance(&self) -> DataProvenance {
            DataProvenance::Real
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    let engine = HexCoverageEngine::new(Arc::new(FailingReducer));
    let err = engine
        .execute(
            &nyc_request(),
            &kelvin_spec(CompletenessPolicy::Exclude),
            decorate_temp,
        )
        .await
        .unwrap_err();

    // No synthetic substitution: the failure reaches the caller as-is.
    match err {
        AtlasError::Reducer(ReducerError::Request(msg)) => {
            assert!(msg.contains("connection refused"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
