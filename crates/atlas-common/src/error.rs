//! Error types for climate-hexmap services.

use thiserror::Error;

/// Result type alias using AtlasError.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Primary error type for coverage-engine and service operations.
#[derive(Debug, Error)]
pub enum AtlasError {
    // === Request validation errors ===
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error(
        "Bounding box too large: {lat_span:.1}° x {lon_span:.1}° would generate \
         ~{estimated} cells (max {max_cells})"
    )]
    BoundsTooLarge {
        lat_span: f64,
        lon_span: f64,
        estimated: u64,
        max_cells: u64,
    },

    #[error("Invalid resolution: {0} (supported range 0-15)")]
    InvalidResolution(u8),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Data errors ===
    #[error("Region reducer unavailable: {0}")]
    ReducerUnavailable(String),

    #[error("Region reducer failed: {0}")]
    Reducer(#[from] ReducerError),

    #[error("No resolvable data in region")]
    NoDataInRegion,

    // === Infrastructure errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtlasError {
    /// HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AtlasError::InvalidBounds(_)
            | AtlasError::BoundsTooLarge { .. }
            | AtlasError::InvalidResolution(_)
            | AtlasError::MissingParameter(_)
            | AtlasError::InvalidParameter { .. } => 400,

            AtlasError::NoDataInRegion => 404,
            AtlasError::ReducerUnavailable(_) => 503,
            AtlasError::Reducer(_) => 502,
            AtlasError::Internal(_) => 500,
        }
    }

    /// Human-readable remedy hint, where one exists.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            AtlasError::BoundsTooLarge { .. } => {
                Some("Zoom in closer to reduce the number of cells in the viewport.")
            }
            AtlasError::NoDataInRegion => {
                Some("The dataset has no coverage here (for example, open ocean).")
            }
            _ => None,
        }
    }
}

/// Errors from the external Region Reducer collaborator.
#[derive(Debug, Error)]
pub enum ReducerError {
    #[error("Reduce request failed: {0}")]
    Request(String),

    #[error("Malformed reducer response: {0}")]
    MalformedResponse(String),

    #[error("Batch of {got} regions exceeds the platform limit of {limit}")]
    BatchTooLarge { got: usize, limit: usize },
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AtlasError::InvalidBounds("x".into()).http_status_code(),
            400
        );
        assert_eq!(AtlasError::InvalidResolution(16).http_status_code(), 400);
        assert_eq!(
            AtlasError::ReducerUnavailable("down".into()).http_status_code(),
            503
        );
        assert_eq!(
            AtlasError::Reducer(ReducerError::Request("boom".into())).http_status_code(),
            502
        );
        assert_eq!(AtlasError::NoDataInRegion.http_status_code(), 404);
    }

    #[test]
    fn test_bounds_too_large_message_names_spans_and_remedy() {
        let err = AtlasError::BoundsTooLarge {
            lat_span: 50.0,
            lon_span: 50.0,
            estimated: 6_416_718,
            max_cells: 4500,
        };
        let msg = err.to_string();
        assert!(msg.contains("50.0°"));
        assert!(msg.contains("6416718"));
        assert!(msg.contains("4500"));
        assert!(err.remedy().unwrap().contains("Zoom in"));
    }
}
