//! Deterministic synthetic reducer for local development.

use async_trait::async_trait;

use atlas_common::ReducerError;
use atlas_protocol::Ring;
use hex_engine::{DataProvenance, RasterSelector, RegionReducer};

/// A synthetic Region Reducer producing smooth, deterministic fields.
///
/// Exists so the HTTP service can be developed without platform credentials.
/// It is selected only by explicit configuration (`REDUCER_MODE=synthetic`)
/// and reports [`DataProvenance::Synthetic`]; it is never substituted for a
/// failed real-data request.
pub struct SyntheticReducer {
    /// Field midpoint, in the raster's native unit.
    base: f64,
    /// Peak deviation from the midpoint.
    amplitude: f64,
}

impl SyntheticReducer {
    /// A field centered on `base` varying by ±`amplitude`.
    pub fn new(base: f64, amplitude: f64) -> Self {
        Self { base, amplitude }
    }

    /// Defaults sized for Kelvin surface temperatures.
    pub fn kelvin_field() -> Self {
        Self::new(288.0, 12.0)
    }

    fn sample(&self, lat: f64, lon: f64) -> f64 {
        // A smooth function of position: repeatable across runs, varied
        // enough to exercise classification buckets.
        let swing = (lat.to_radians() * 3.0).sin() * (lon.to_radians() * 2.0).cos();
        self.base + self.amplitude * swing
    }
}

#[async_trait]
impl RegionReducer for SyntheticReducer {
    async fn reduce_mean(
        &self,
        regions: &[Ring],
        _selector: &RasterSelector,
    ) -> Result<Vec<Option<f64>>, ReducerError> {
        Ok(regions
            .iter()
            .map(|ring| {
                let n = (ring.len().saturating_sub(1)).max(1) as f64;
                let lon = ring[..ring.len() - 1].iter().map(|v| v[0]).sum::<f64>() / n;
                let lat = ring[..ring.len() - 1].iter().map(|v| v[1]).sum::<f64>() / n;
                Some(self.sample(lat, lon))
            })
            .collect())
    }

    fn provenance(&self) -> DataProvenance {
        DataProvenance::Synthetic
    }

    fn describe(&self) -> String {
        "Synthetic development data (not observed)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_at(lat: f64, lon: f64) -> Ring {
        vec![
            [lon - 0.01, lat - 0.01],
            [lon + 0.01, lat - 0.01],
            [lon + 0.01, lat + 0.01],
            [lon - 0.01, lat - 0.01],
        ]
    }

    #[tokio::test]
    async fn test_deterministic_across_calls() {
        let reducer = SyntheticReducer::kelvin_field();
        let regions = vec![ring_at(40.5, -74.0), ring_at(41.0, -73.5)];
        let selector = RasterSelector::new("C", "b");

        let a = reducer.reduce_mean(&regions, &selector).await.unwrap();
        let b = reducer.reduce_mean(&regions, &selector).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_values_stay_within_amplitude() {
        let reducer = SyntheticReducer::new(288.0, 12.0);
        let regions = vec![ring_at(40.5, -74.0), ring_at(-33.9, 151.2)];
        let values = reducer
            .reduce_mean(&regions, &RasterSelector::new("C", "b"))
            .await
            .unwrap();

        for value in values.into_iter().flatten() {
            assert!((276.0..=300.0).contains(&value));
        }
    }

    #[test]
    fn test_provenance_is_synthetic() {
        assert_eq!(
            SyntheticReducer::kelvin_field().provenance(),
            DataProvenance::Synthetic
        );
    }
}
