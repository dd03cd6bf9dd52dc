//! Bounding-box safety governor.
//!
//! Estimates the cell count a viewport would generate and rejects requests
//! that would exceed the external platform's query budget, before any
//! generation or network work happens.

use atlas_common::{AtlasError, AtlasResult, CellResolution, GeoBounds};

/// Default cell ceiling. Stays under the external reducer's hard batch limit
/// of 5000 elements with headroom.
pub const DEFAULT_MAX_CELLS: u64 = 4500;

/// A validated pre-flight estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEstimate {
    /// Approximate number of cells the viewport would generate.
    pub estimated: u64,
    /// The ceiling the estimate was checked against.
    pub max_cells: u64,
}

/// Estimate the cell count for `bounds` at `resolution` and reject the
/// request if it exceeds `max_cells`.
///
/// Pure function: flat-Earth bbox area divided by the resolution's
/// approximate cell area. The approximation degrades near the poles, always
/// toward overestimation, which is the safe direction for a capacity check.
pub fn estimate_and_validate(
    bounds: &GeoBounds,
    resolution: CellResolution,
    max_cells: u64,
) -> AtlasResult<CellEstimate> {
    let estimated = (bounds.area_km2() / resolution.cell_area_km2()).ceil() as u64;

    if estimated > max_cells {
        return Err(AtlasError::BoundsTooLarge {
            lat_span: bounds.lat_span(),
            lon_span: bounds.lon_span(),
            estimated,
            max_cells,
        });
    }

    Ok(CellEstimate {
        estimated,
        max_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_oversize_viewport() {
        // 50° x 50° at res 7 (~4.8 km² cells): (50*111)^2 / 4.8 >> 4500.
        let bounds = GeoBounds::new(50.0, 0.0, 50.0, 0.0).unwrap();
        let res = CellResolution::new(7).unwrap();
        let err = estimate_and_validate(&bounds, res, DEFAULT_MAX_CELLS).unwrap_err();
        match err {
            AtlasError::BoundsTooLarge {
                estimated,
                max_cells,
                ..
            } => {
                assert!(estimated > 6_000_000);
                assert_eq!(max_cells, DEFAULT_MAX_CELLS);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accepts_in_budget_viewport() {
        // 1° x 1° at res 5 (~240 km² cells): 111*111/240 ≈ 52 cells.
        let bounds = GeoBounds::new(41.0, 40.0, -73.0, -74.0).unwrap();
        let res = CellResolution::new(5).unwrap();
        let estimate = estimate_and_validate(&bounds, res, DEFAULT_MAX_CELLS).unwrap();
        assert!(estimate.estimated >= 50 && estimate.estimated <= 55);
    }

    #[test]
    fn test_respects_custom_ceiling() {
        let bounds = GeoBounds::new(41.0, 40.0, -73.0, -74.0).unwrap();
        let res = CellResolution::new(5).unwrap();
        assert!(estimate_and_validate(&bounds, res, 10).is_err());
        assert!(estimate_and_validate(&bounds, res, 100).is_ok());
    }
}
