//! Shared handler utilities: parameter validation and response shaping.
//!
//! Validation happens here, at the boundary; an invalid request never
//! reaches the generator or binder.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use atlas_common::{AtlasError, CellResolution, GeoBounds};
use atlas_protocol::{CollectionMetadata, DataEnvelope, ErrorResponse, HexFeatureCollection};

/// Render an [`AtlasError`] as a structured JSON error response.
pub fn error_response(err: &AtlasError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = ErrorResponse::new(err.to_string());
    if let Some(remedy) = err.remedy() {
        body = body.with_remedy(remedy);
    }

    (status, Json(body)).into_response()
}

/// Wrap a FeatureCollection in the success envelope.
pub fn ok_envelope(fc: HexFeatureCollection) -> Response {
    let count = fc.features.len();
    let envelope = DataEnvelope::new(fc).with_metadata("featureCount", count);
    (StatusCode::OK, Json(envelope)).into_response()
}

/// 200 with an empty collection: the region simply has no dataset coverage,
/// which is not a failure.
pub fn empty_collection(source: &str, resolution: CellResolution, is_real_data: bool) -> Response {
    ok_envelope(HexFeatureCollection::empty(CollectionMetadata::new(
        source,
        resolution.level(),
        is_real_data,
    )))
}

/// Assemble bounds from the four required query parameters.
pub fn parse_bounds(
    north: Option<f64>,
    south: Option<f64>,
    east: Option<f64>,
    west: Option<f64>,
) -> Result<GeoBounds, AtlasError> {
    let require = |name: &str, v: Option<f64>| {
        v.ok_or_else(|| AtlasError::MissingParameter(name.to_string()))
    };

    GeoBounds::new(
        require("north", north)?,
        require("south", south)?,
        require("east", east)?,
        require("west", west)?,
    )
}

/// Validate a resolution against the dataset's supported range.
pub fn parse_resolution(
    raw: Option<u8>,
    default: u8,
    min: u8,
    max: u8,
) -> Result<CellResolution, AtlasError> {
    let level = raw.unwrap_or(default);
    if level < min || level > max {
        return Err(AtlasError::InvalidParameter {
            param: "resolution".to_string(),
            message: format!("must be between {min} and {max}"),
        });
    }
    CellResolution::new(level)
}

/// Validate an integer parameter against an inclusive range.
pub fn validate_year(year: i32, min: i32, max: i32) -> Result<i32, AtlasError> {
    if year < min || year > max {
        return Err(AtlasError::InvalidParameter {
            param: "year".to_string(),
            message: format!("must be between {min} and {max}"),
        });
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds_requires_all_corners() {
        let err = parse_bounds(Some(41.0), Some(40.0), Some(-73.0), None).unwrap_err();
        assert!(matches!(err, AtlasError::MissingParameter(p) if p == "west"));
    }

    #[test]
    fn test_parse_bounds_validates_geometry() {
        // south > north is caught here, at the boundary.
        assert!(parse_bounds(Some(40.0), Some(41.0), Some(-73.0), Some(-75.0)).is_err());
    }

    #[test]
    fn test_parse_resolution_enforces_dataset_range() {
        assert_eq!(parse_resolution(None, 7, 1, 10).unwrap().level(), 7);
        assert_eq!(parse_resolution(Some(3), 7, 1, 10).unwrap().level(), 3);
        assert!(parse_resolution(Some(11), 7, 1, 10).is_err());
        assert!(parse_resolution(Some(0), 7, 1, 10).is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year(2050, 2020, 2100).is_ok());
        assert!(validate_year(2019, 2020, 2100).is_err());
        assert!(validate_year(2101, 2020, 2100).is_err());
    }
}
