//! Image tag records as reported by the registry.

use chrono::{DateTime, FixedOffset, NaiveDate};
use regsweep_common::{SweepError, SweepResult};
use serde::{Deserialize, Deserializer};

/// Datetime layout used by `gcloud container images list-tags --format json`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// One image in a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    /// Content digest (e.g. `sha256:...`).
    pub digest: String,
    /// Tags pointing at this image, in registry order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Upload time; absent for very old images.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

#[derive(Deserialize)]
struct RawTimestamp {
    datetime: String,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawTimestamp>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw.datetime).map_err(serde::de::Error::custom))
        .transpose()
}

/// Parse a registry datetime such as `2024-01-01 12:00:00+00:00`.
///
/// # Errors
///
/// Returns [`SweepError::InvalidTimestamp`] if the text does not match
/// [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> SweepResult<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        SweepError::InvalidTimestamp {
            value: value.to_string(),
        }
    })
}

impl ImageRecord {
    /// Create a record.
    pub fn new(
        digest: impl Into<String>,
        tags: Vec<String>,
        timestamp: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            digest: digest.into(),
            tags,
            timestamp,
        }
    }

    /// Calendar date of the upload, in the timestamp's own offset.
    #[must_use]
    pub fn image_date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }
}

/// Parse the JSON output of a tag listing.
///
/// # Errors
///
/// Returns [`SweepError::MalformedListing`] if the output is not a JSON array
/// of records.
pub fn parse_listing(repository: &str, output: &[u8]) -> SweepResult<Vec<ImageRecord>> {
    serde_json::from_slice(output).map_err(|e| SweepError::MalformedListing {
        repository: repository.to_string(),
        message: e.to_string(),
    })
}
