//! The `{"data": ...}` wrapper used by every ledger API response.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Response wrapper: the payload lives under a single `data` key.
///
/// Any sibling keys (`meta`, `links`) are ignored.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped payload.
    pub data: T,
}

/// Why a response body could not be decoded.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Invalid JSON, or JSON whose shape does not match; carries the path of
    /// the offending value (e.g. `data.version`).
    #[error(transparent)]
    Shape(#[from] serde_path_to_error::Error<serde_json::Error>),

    /// A complete document was followed by more input.
    #[error("trailing characters after JSON document: {0}")]
    Trailing(#[source] serde_json::Error),
}

/// Decodes `body` as an [`Envelope`] and returns its payload.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, EnvelopeError> {
    let mut de = serde_json::Deserializer::from_slice(body);
    let envelope: Envelope<T> = serde_path_to_error::deserialize(&mut de)?;
    de.end().map_err(EnvelopeError::Trailing)?;
    Ok(envelope.data)
}
