//! GeoJSON assembly of bound cells.

use serde_json::{Map, Value};

use atlas_protocol::{CollectionMetadata, HexFeature, HexFeatureCollection};

use crate::binder::BoundCell;
use crate::grid::{cell_center, cell_ring};

/// Assemble bound cells into a FeatureCollection.
///
/// Every feature gets the cell id and center; `decorate` adds the
/// dataset-specific properties (value keys, classification bucket,
/// pass-through request parameters). The ring comes from
/// [`cell_ring`], so it is already [lon, lat] ordered and closed.
pub fn to_feature_collection<F>(
    cells: &[BoundCell],
    mut metadata: CollectionMetadata,
    decorate: F,
) -> HexFeatureCollection
where
    F: Fn(&BoundCell, &mut Map<String, Value>),
{
    let features: Vec<HexFeature> = cells
        .iter()
        .map(|bound| {
            let (lat, lon) = cell_center(bound.cell);
            let mut properties = Map::new();
            properties.insert("hexId".to_string(), bound.cell.to_string().into());
            properties.insert("lat".to_string(), round4(lat).into());
            properties.insert("lon".to_string(), round4(lon).into());
            decorate(bound, &mut properties);

            HexFeature::polygon(cell_ring(bound.cell), properties)
        })
        .collect();

    metadata.count = features.len();
    HexFeatureCollection::new(features, metadata)
}

/// Round to 4 decimal places (~11 m), enough for display coordinates.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal places, used for reported measurement values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use h3o::{LatLng, Resolution};

    fn bound_cell(lat: f64, lon: f64, value: f64) -> BoundCell {
        BoundCell {
            cell: LatLng::new(lat, lon).unwrap().to_cell(Resolution::Seven),
            value,
            interpolated: false,
        }
    }

    #[test]
    fn test_features_carry_id_center_and_decoration() {
        let cells = vec![bound_cell(40.5, -74.0, 26.85)];
        let metadata = CollectionMetadata::new("Test", 7, true);

        let fc = to_feature_collection(&cells, metadata, |bound, props| {
            props.insert("tempC".to_string(), round2(bound.value).into());
        });

        assert_eq!(fc.metadata.count, 1);
        let props = &fc.features[0].properties;
        assert_eq!(props["tempC"], 26.85);
        assert!(props["hexId"].as_str().unwrap().len() > 10);
        assert!((props["lat"].as_f64().unwrap() - 40.5).abs() < 0.1);
    }

    #[test]
    fn test_rings_are_closed_and_lon_lat_ordered() {
        let cells = vec![bound_cell(40.5, -74.0, 1.0)];
        let fc = to_feature_collection(&cells, CollectionMetadata::new("Test", 7, true), |_, _| {});

        let ring = fc.features[0].geometry.exterior();
        assert_eq!(ring.first(), ring.last());
        for [lon, lat] in ring {
            assert!((-75.0..=-73.0).contains(lon));
            assert!((40.0..=41.0).contains(lat));
        }
    }

    #[test]
    fn test_count_matches_features() {
        let cells = vec![
            bound_cell(40.5, -74.0, 1.0),
            bound_cell(40.6, -74.1, 2.0),
            bound_cell(40.7, -74.2, 3.0),
        ];
        let fc = to_feature_collection(&cells, CollectionMetadata::new("Test", 7, true), |_, _| {});
        assert_eq!(fc.metadata.count, 3);
        assert_eq!(fc.features.len(), 3);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round4(40.123456), 40.1235);
        assert_eq!(round2(26.849999), 26.85);
    }
}
