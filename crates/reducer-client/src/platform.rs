//! HTTP client for the remote geospatial-analysis platform.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use atlas_common::{AtlasError, AtlasResult, ReducerError};
use atlas_protocol::Ring;
use hex_engine::{DataProvenance, RasterSelector, RegionReducer};

use crate::config::ReducerConfig;

/// The platform's hard batch ceiling for region reductions.
pub const PLATFORM_BATCH_LIMIT: usize = 5000;

/// Client for the platform's batch reduce and visualization endpoints.
///
/// Construct once at startup and share behind an `Arc`; the client holds a
/// connection pool and a per-request timeout.
pub struct PlatformReducer {
    http: reqwest::Client,
    endpoint: String,
    attribution: String,
}

/// Wire request for `POST /v1/reduce`.
#[derive(Debug, Serialize)]
struct ReduceRequest<'a> {
    collection: &'a str,
    band: &'a str,
    reducer: &'static str,
    scale_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_range: Option<&'a (String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<[&'a str; 2]>,
    regions: &'a [Ring],
}

/// Wire response for `POST /v1/reduce`: one entry per region, `null` where
/// the raster has no data.
#[derive(Debug, Deserialize)]
struct ReduceResponse {
    values: Vec<Option<f64>>,
}

/// Parameters for a visualization tile request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSpec {
    pub collection: String,
    pub band: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<(String, String)>,
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

/// A resolved tile URL template plus attribution.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TileUrlInfo {
    pub tile_url: String,
    pub attribution: String,
}

impl PlatformReducer {
    /// Build the client from configuration. Fails when the endpoint is
    /// unusable, so a misconfigured process stops at startup instead of on
    /// its first request.
    pub fn new(config: &ReducerConfig) -> AtlasResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AtlasError::ReducerUnavailable(
                "reducer endpoint is not configured".to_string(),
            ));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| {
                    AtlasError::ReducerUnavailable("API key is not a valid header value".into())
                })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| AtlasError::ReducerUnavailable(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            attribution: "Remote geospatial analysis platform".to_string(),
        })
    }

    /// Fetch a visualization tile URL template for a raster.
    ///
    /// Not part of the `RegionReducer` contract: the coverage engine never
    /// needs tiles, only the HTTP layer's tile endpoints do.
    pub async fn visualization_tile_url(&self, spec: &TileSpec) -> Result<TileUrlInfo, ReducerError> {
        let url = format!("{}/v1/visualize", self.endpoint);
        let response = self
            .http
            .post(&url)
            .json(spec)
            .send()
            .await
            .map_err(request_error)?;

        let response = response.error_for_status().map_err(request_error)?;
        response
            .json::<TileUrlInfo>()
            .await
            .map_err(|e| ReducerError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl RegionReducer for PlatformReducer {
    async fn reduce_mean(
        &self,
        regions: &[Ring],
        selector: &RasterSelector,
    ) -> Result<Vec<Option<f64>>, ReducerError> {
        if regions.len() > PLATFORM_BATCH_LIMIT {
            return Err(ReducerError::BatchTooLarge {
                got: regions.len(),
                limit: PLATFORM_BATCH_LIMIT,
            });
        }

        let body = ReduceRequest {
            collection: &selector.collection,
            band: &selector.band,
            reducer: "mean",
            scale_meters: selector.scale_meters,
            date_range: selector.date_range.as_ref(),
            filters: selector
                .filters
                .iter()
                .map(|(k, v)| [k.as_str(), v.as_str()])
                .collect(),
            regions,
        };

        tracing::debug!(
            collection = %selector.collection,
            band = %selector.band,
            regions = regions.len(),
            "dispatching batch reduction"
        );

        let url = format!("{}/v1/reduce", self.endpoint);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let response = response.error_for_status().map_err(request_error)?;
        let parsed: ReduceResponse = response
            .json()
            .await
            .map_err(|e| ReducerError::MalformedResponse(e.to_string()))?;

        if parsed.values.len() != regions.len() {
            return Err(ReducerError::MalformedResponse(format!(
                "asked for {} regions, platform answered {}",
                regions.len(),
                parsed.values.len()
            )));
        }

        Ok(parsed.values)
    }

    fn provenance(&self) -> DataProvenance {
        DataProvenance::Real
    }

    fn describe(&self) -> String {
        self.attribution.clone()
    }
}

fn request_error(err: reqwest::Error) -> ReducerError {
    ReducerError::Request(err.to_string())
}
