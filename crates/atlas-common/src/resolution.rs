//! H3 cell resolution with capacity-estimation lookup tables.

use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

/// Approximate average cell area in km² per H3 resolution.
///
/// Lookup constants used for capacity estimation only; the values are the
/// published per-resolution averages, rounded.
const CELL_AREA_KM2: [f64; 16] = [
    4_250_000.0,
    607_000.0,
    86_000.0,
    12_000.0,
    1_700.0,
    240.0,
    34.0,
    4.8,
    0.7,
    0.1,
    0.015,
    0.0021,
    0.0003,
    0.000043,
    0.0000063,
    0.0000009,
];

/// Approximate average edge length in degrees per H3 resolution.
///
/// Used only to size the dense-grid fallback step.
const EDGE_LENGTH_DEG: [f64; 16] = [
    9.98, 3.77, 1.42, 0.538, 0.203, 0.075, 0.028, 0.010, 0.004, 0.0016, 0.00059, 0.00022,
    0.000085, 0.000032, 0.000012, 0.0000046,
];

/// A validated H3 resolution level (0-15).
///
/// Higher resolutions mean smaller cells and more cells per unit area.
/// Construction never clamps: out-of-range levels fail with
/// [`AtlasError::InvalidResolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellResolution(u8);

impl CellResolution {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 15;

    /// Create a resolution, rejecting levels outside [0, 15].
    pub fn new(level: u8) -> Result<Self, AtlasError> {
        if level > Self::MAX {
            return Err(AtlasError::InvalidResolution(level));
        }
        Ok(Self(level))
    }

    /// The raw resolution level.
    pub fn level(&self) -> u8 {
        self.0
    }

    /// Approximate average cell area in km² at this resolution.
    pub fn cell_area_km2(&self) -> f64 {
        CELL_AREA_KM2[self.0 as usize]
    }

    /// Approximate average cell edge length in degrees at this resolution.
    pub fn edge_length_deg(&self) -> f64 {
        EDGE_LENGTH_DEG[self.0 as usize]
    }

    /// The equivalent `h3o` resolution.
    pub fn to_h3(&self) -> h3o::Resolution {
        // Always in range: self.0 was validated at construction.
        h3o::Resolution::try_from(self.0).unwrap_or(h3o::Resolution::Fifteen)
    }
}

impl TryFrom<u8> for CellResolution {
    type Error = AtlasError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<CellResolution> for u8 {
    fn from(r: CellResolution) -> u8 {
        r.0
    }
}

impl std::fmt::Display for CellResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        assert!(CellResolution::new(0).is_ok());
        assert!(CellResolution::new(15).is_ok());
    }

    #[test]
    fn test_out_of_range_never_clamps() {
        let err = CellResolution::new(16).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidResolution(16)));
    }

    #[test]
    fn test_lookup_tables() {
        let res7 = CellResolution::new(7).unwrap();
        assert_eq!(res7.cell_area_km2(), 4.8);
        assert_eq!(res7.edge_length_deg(), 0.010);

        let res5 = CellResolution::new(5).unwrap();
        assert_eq!(res5.cell_area_km2(), 240.0);
    }

    #[test]
    fn test_h3_interop() {
        let res = CellResolution::new(7).unwrap();
        assert_eq!(u8::from(res.to_h3()), 7);
    }

    #[test]
    fn test_serde_round_trip() {
        let res: CellResolution = serde_json::from_str("7").unwrap();
        assert_eq!(res.level(), 7);
        assert!(serde_json::from_str::<CellResolution>("16").is_err());
    }
}
