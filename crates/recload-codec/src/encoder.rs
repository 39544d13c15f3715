use serde::Serialize;

use crate::compression::{self, CompressionFormat, MAX_COMPRESSION_LEVEL};
use crate::config::EncodeConfig;
use crate::error::EncodeError;

/// A compressed payload ready to be handed to the decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedPayload {
    /// The gzip or zlib stream.
    pub bytes: Vec<u8>,

    /// Size of the compact JSON text before compression.
    pub json_size: usize,

    pub format: CompressionFormat,
}

impl EncodedPayload {
    #[must_use]
    pub fn compressed_size(&self) -> usize {
        self.bytes.len()
    }

    /// Fraction of the JSON size saved by compression, in `[0, 1)` for
    /// compressible input. Negative when compression inflated the data.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn savings(&self) -> f64 {
        if self.json_size == 0 {
            return 0.0;
        }
        1.0 - self.bytes.len() as f64 / self.json_size as f64
    }
}

/// Producer side of the pipeline: serializes a value as compact JSON
/// (no whitespace between tokens) and compresses it.
///
/// The default configuration writes gzip at level 9, the format the
/// decoder expects for shipped datasets.
///
/// # Example
///
/// ```rust
/// use recload_codec::{EncodeConfig, PayloadEncoder};
/// use serde_json::json;
///
/// let encoder = PayloadEncoder::new(EncodeConfig::default().with_level(6));
/// let payload = encoder.encode(&json!([{"year": 2024}])).unwrap();
/// assert_eq!(payload.json_size, 15);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PayloadEncoder {
    config: EncodeConfig,
}

impl PayloadEncoder {
    #[must_use]
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Serialize `value` compactly and compress it.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::InvalidLevel`] if the configured level is above 9.
    /// - [`EncodeError::Serialize`] if `value` cannot be represented as
    ///   JSON (e.g. a map with non-string keys).
    /// - [`EncodeError::Io`] if the compressor fails.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<EncodedPayload, EncodeError> {
        if self.config.level > MAX_COMPRESSION_LEVEL {
            return Err(EncodeError::InvalidLevel(self.config.level));
        }
        let json = serde_json::to_vec(value)?;
        self.encode_text(&json)
    }

    /// Compress already-serialized JSON text as-is.
    ///
    /// # Errors
    ///
    /// Same as [`encode`](Self::encode), minus serialization.
    pub fn encode_text(&self, json: &[u8]) -> Result<EncodedPayload, EncodeError> {
        let bytes = compression::compress(json, self.config.format, self.config.level)?;
        tracing::debug!(
            format = %self.config.format,
            level = self.config.level,
            json = json.len(),
            compressed = bytes.len(),
            "encoded payload"
        );
        Ok(EncodedPayload {
            bytes,
            json_size: json.len(),
            format: self.config.format,
        })
    }
}
