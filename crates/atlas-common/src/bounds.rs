//! Geographic bounding box for viewport queries.

use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

/// Kilometers per degree of latitude. The same constant is used for
/// longitude, which overstates area away from the equator; the estimate is
/// only used for capacity checks, where overstating is the safe direction.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A geographic bounding box in degrees (EPSG:4326).
///
/// Invariants, enforced at construction: `south < north`, `west < east`,
/// latitudes within [-90, 90], longitudes within [-180, 180]. Viewports that
/// cross the antimeridian violate `west < east` and are rejected rather than
/// wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Create a bounding box, validating all invariants.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, AtlasError> {
        for (name, v) in [("north", north), ("south", south), ("east", east), ("west", west)] {
            if !v.is_finite() {
                return Err(AtlasError::InvalidBounds(format!(
                    "{name} is not a finite number"
                )));
            }
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(AtlasError::InvalidBounds(format!(
                "latitudes must be within [-90, 90], got south={south}, north={north}"
            )));
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(AtlasError::InvalidBounds(format!(
                "longitudes must be within [-180, 180], got west={west}, east={east}"
            )));
        }
        if south >= north {
            return Err(AtlasError::InvalidBounds(format!(
                "south ({south}) must be less than north ({north})"
            )));
        }
        if west >= east {
            return Err(AtlasError::InvalidBounds(format!(
                "west ({west}) must be less than east ({east}); \
                 antimeridian-crossing viewports are not supported"
            )));
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Approximate area in km² using a flat-Earth approximation.
    pub fn area_km2(&self) -> f64 {
        (self.lat_span() * KM_PER_DEGREE) * (self.lon_span() * KM_PER_DEGREE)
    }

    /// Expand the box outward by `fraction` of each span, clamping latitude
    /// to [-90, 90]. Used to guarantee seamless coverage across adjacent
    /// viewport tiles while panning.
    pub fn buffered(&self, fraction: f64) -> GeoBounds {
        if fraction <= 0.0 {
            return *self;
        }
        let lat_pad = self.lat_span() * fraction;
        let lon_pad = self.lon_span() * fraction;
        GeoBounds {
            north: (self.north + lat_pad).min(90.0),
            south: (self.south - lat_pad).max(-90.0),
            east: (self.east + lon_pad).min(180.0),
            west: (self.west - lon_pad).max(-180.0),
        }
    }

    /// Corner coordinates as (lon, lat) pairs, counterclockwise from the
    /// southwest corner. Not closed; callers repeat the first vertex where a
    /// closed ring is required.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.west, self.south),
            (self.east, self.south),
            (self.east, self.north),
            (self.west, self.north),
        ]
    }

    /// Check whether a point falls within the box (inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}
