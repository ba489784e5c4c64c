use aq_client::domain::Measurement;

use crate::store::MeasurementStore;

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("source error: {0}")]
    Source(String),
    #[error("store error: {0}")]
    Store(String),
}

/// A provider of fresh air-quality measurements.
///
/// The refresh flow depends on this seam rather than on a concrete HTTP
/// client, so tests can drive it with canned data.
#[async_trait::async_trait]
pub trait MeasurementSource: Send + Sync {
    /// Fetch current measurements for one pollutant parameter (e.g. "pm25").
    ///
    /// Returns an empty list when the upstream API answers with a
    /// non-success status or an empty body; errors only when the request
    /// itself fails or a non-empty body cannot be decoded.
    async fn fetch_measurements(&self, parameter: &str) -> Result<Vec<Measurement>, IngestError>;
}

/// Discard all stored records and repopulate them from a fresh fetch.
///
/// The reset runs before the fetch; a failed fetch therefore leaves the
/// store empty. Returns the number of rows inserted.
pub async fn refresh(
    store: &MeasurementStore,
    source: &dyn MeasurementSource,
    parameter: &str,
) -> Result<u64, IngestError> {
    store
        .reset()
        .await
        .map_err(|e| IngestError::Store(e.to_string()))?;

    let measurements = source.fetch_measurements(parameter).await?;

    let inserted = store
        .insert_many(&measurements)
        .await
        .map_err(|e| IngestError::Store(e.to_string()))?;

    tracing::info!(parameter, inserted, "measurement store refreshed");

    Ok(inserted)
}
