//! GeoJSON wire types for climate-hexmap responses.
//!
//! The mapping front end consumes hexagonal coverages as GeoJSON
//! FeatureCollections with a top-level `metadata` object. These types own the
//! serialization contract: polygon rings in [lon, lat] order, explicitly
//! closed, and an `isRealData` flag that is true only when every feature's
//! value came from the real Region Reducer.

pub mod geojson;
pub mod responses;

pub use geojson::{
    CollectionMetadata, Geometry, HexFeature, HexFeatureCollection, Ring,
};
pub use responses::{DataEnvelope, ErrorResponse};
