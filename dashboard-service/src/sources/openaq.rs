use std::time::Duration;

use aq_client::domain::Measurement;

use crate::ingest::{IngestError, MeasurementSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an OpenAQ-style measurements API.
pub struct OpenAqSource {
    http: reqwest::Client,
    base_url: String,
}

/// Expected body shape: `{"results": [{"date": {"utc": ...}, "value": ...}]}`.
///
/// Every field an item may lack is optional; anything else in the payload is
/// ignored.
#[derive(serde::Deserialize)]
struct MeasurementsBody {
    #[serde(default)]
    results: Vec<RawMeasurement>,
}

#[derive(serde::Deserialize)]
struct RawMeasurement {
    date: Option<RawDate>,
    value: Option<f64>,
}

#[derive(serde::Deserialize)]
struct RawDate {
    utc: Option<String>,
}

impl OpenAqSource {
    pub fn new(base_url: &str) -> Result<Self, IngestError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IngestError::Source(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Turn one API response into measurements.
///
/// Non-success statuses and empty bodies degrade to an empty list; a
/// non-empty body that fails to decode is an error. Items missing either
/// `date.utc` or `value` are dropped.
fn measurements_from_body(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Vec<Measurement>, IngestError> {
    if !status.is_success() {
        tracing::warn!(status = %status, "measurements request returned non-success status");
        metrics::counter!("openaq_fetch_failures_total").increment(1);
        return Ok(Vec::new());
    }
    if body.trim().is_empty() {
        tracing::warn!("measurements response body was empty");
        return Ok(Vec::new());
    }

    let parsed: MeasurementsBody = serde_json::from_str(body)
        .map_err(|e| IngestError::Source(format!("failed to decode measurements body: {e}")))?;

    let mut out = Vec::with_capacity(parsed.results.len());
    for item in parsed.results {
        let utc = item.date.and_then(|d| d.utc);
        match (utc, item.value) {
            (Some(datetime), Some(value)) => out.push(Measurement { datetime, value }),
            _ => {
                metrics::counter!("openaq_items_skipped_total").increment(1);
            }
        }
    }
    Ok(out)
}

#[async_trait::async_trait]
impl MeasurementSource for OpenAqSource {
    async fn fetch_measurements(&self, parameter: &str) -> Result<Vec<Measurement>, IngestError> {
        metrics::counter!("openaq_fetch_requests_total").increment(1);

        let url = format!("{}/measurements", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("parameter", parameter)])
            .send()
            .await
            .map_err(|e| IngestError::Source(format!("measurements request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IngestError::Source(format!("failed to read measurements body: {e}")))?;

        measurements_from_body(status, &body)
    }
}
