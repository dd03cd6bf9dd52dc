//! Hexagonal GeoJSON FeatureCollection types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A polygon ring: [lon, lat] vertex pairs, first vertex repeated at the end.
pub type Ring = Vec<[f64; 2]>;

/// A GeoJSON FeatureCollection of hexagonal cells plus response metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HexFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of hexagon features.
    pub features: Vec<HexFeature>,

    /// Top-level response metadata (attribution, counts, provenance).
    pub metadata: CollectionMetadata,
}

impl HexFeatureCollection {
    /// Create a collection from assembled features and metadata.
    pub fn new(features: Vec<HexFeature>, metadata: CollectionMetadata) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
            metadata,
        }
    }

    /// Create an empty collection (e.g. a viewport with no dataset coverage).
    pub fn empty(metadata: CollectionMetadata) -> Self {
        Self::new(Vec::new(), metadata)
    }
}

/// A single hexagon feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HexFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Polygon geometry of the cell boundary.
    pub geometry: Geometry,

    /// Feature properties: cell id, center, resolved value, classification.
    pub properties: Map<String, Value>,
}

impl HexFeature {
    /// Create a feature from a closed exterior ring and its properties.
    pub fn polygon(ring: Ring, properties: Map<String, Value>) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::Polygon {
                coordinates: vec![ring],
            },
            properties,
        }
    }
}

/// GeoJSON geometry. Hexagonal coverages only emit polygons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A polygon geometry.
    Polygon {
        /// Array of linear rings (first is exterior, rest are holes).
        /// Each ring is an array of [longitude, latitude] pairs.
        coordinates: Vec<Ring>,
    },
}

impl Geometry {
    /// The exterior ring of a polygon geometry.
    pub fn exterior(&self) -> &Ring {
        match self {
            Geometry::Polygon { coordinates } => &coordinates[0],
        }
    }
}

/// Top-level metadata on a FeatureCollection response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionMetadata {
    /// Source attribution (dataset + platform).
    pub source: String,

    /// Number of features in the collection.
    pub count: usize,

    /// Number of generated cells the reducer returned no data for.
    #[serde(rename = "missingCells")]
    pub missing_cells: usize,

    /// H3 resolution used for the coverage.
    pub resolution: u8,

    /// True only when every feature value came from the real Region Reducer.
    /// A synthetic or fallback source must never set this.
    #[serde(rename = "isRealData")]
    pub is_real_data: bool,

    /// Pass-through request parameters (year, scenario, ...) for
    /// client-side context.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl CollectionMetadata {
    pub fn new(source: impl Into<String>, resolution: u8, is_real_data: bool) -> Self {
        Self {
            source: source.into(),
            count: 0,
            missing_cells: 0,
            resolution,
            is_real_data,
            params: Map::new(),
        }
    }

    /// Attach a pass-through request parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_ring() -> Ring {
        vec![
            [-74.0, 40.0],
            [-73.9, 40.0],
            [-73.9, 40.1],
            [-74.0, 40.1],
            [-74.0, 40.0],
        ]
    }

    #[test]
    fn test_feature_collection_serialization() {
        let mut props = Map::new();
        props.insert("hexId".into(), "872a10000ffffff".into());

        let metadata = CollectionMetadata::new("Test Source", 7, true).with_param("year", 2050);
        let fc = HexFeatureCollection::new(vec![HexFeature::polygon(closed_ring(), props)], {
            let mut m = metadata;
            m.count = 1;
            m
        });

        let json: Value = serde_json::to_value(&fc).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(json["metadata"]["isRealData"], true);
        assert_eq!(json["metadata"]["year"], 2050);
        assert_eq!(json["metadata"]["count"], 1);
    }

    #[test]
    fn test_ring_is_closed() {
        let ring = closed_ring();
        let feature = HexFeature::polygon(ring.clone(), Map::new());
        let exterior = feature.geometry.exterior();
        assert_eq!(exterior.first(), exterior.last());
        assert_eq!(exterior.len(), ring.len());
    }

    #[test]
    fn test_empty_collection() {
        let fc = HexFeatureCollection::empty(CollectionMetadata::new("Test", 7, true));
        assert!(fc.features.is_empty());
        assert_eq!(fc.metadata.count, 0);
    }
}
