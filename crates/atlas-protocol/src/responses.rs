//! HTTP response envelopes.
//!
//! All dataset endpoints answer with either a success envelope wrapping the
//! payload or a structured error with an optional remedy hint. Callers never
//! receive a stack trace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Success envelope for dataset responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,

    /// Request-level metadata (echoed parameters, feature counts).
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub metadata: Map<String, Value>,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,

    /// Human-readable remedy hint (e.g. "zoom in"), where one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remedy: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            remedy: None,
        }
    }

    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remedy = Some(remedy.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let resp = ErrorResponse::new("Bounding box too large").with_remedy("Zoom in closer.");
        let json: Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["remedy"], "Zoom in closer.");
    }

    #[test]
    fn test_error_response_omits_absent_remedy() {
        let json = serde_json::to_string(&ErrorResponse::new("boom")).unwrap();
        assert!(!json.contains("remedy"));
    }

    #[test]
    fn test_data_envelope() {
        let env = DataEnvelope::new(serde_json::json!({"k": 1})).with_metadata("year", 2050);
        let json: Value = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["metadata"]["year"], 2050);
    }
}
