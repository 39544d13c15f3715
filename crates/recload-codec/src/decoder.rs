use std::time::{Duration, Instant};

use serde_json::Value;

use crate::compression::{self, CompressionFormat};
use crate::config::DecodeConfig;
use crate::error::DecodeError;

/// The result of decoding a compressed record payload.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ DecodedPayload                                           │
/// │   data:              Value          ← parsed JSON tree   │
/// │   record_count:      Option<usize>  ← array length only  │
/// │   elapsed:           Duration       ← inflate + parse    │
/// │   format:            gzip | zlib                         │
/// │   compressed_size:   usize                               │
/// │   decompressed_size: usize                               │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPayload {
    /// The parsed JSON value.
    pub data: Value,

    /// Number of records when `data` is a JSON array, `None` for
    /// objects and scalars.
    pub record_count: Option<usize>,

    /// Monotonic time spent inflating and parsing.
    pub elapsed: Duration,

    /// Container format detected from the buffer's leading bytes.
    pub format: CompressionFormat,

    /// Size of the buffer handed to the decoder.
    pub compressed_size: usize,

    /// Size of the inflated JSON text.
    pub decompressed_size: usize,
}

impl DecodedPayload {
    /// Elapsed decode time in fractional seconds.
    #[must_use]
    pub fn load_time_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Inflated size divided by compressed size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn expansion_ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.decompressed_size as f64 / self.compressed_size as f64
    }
}

/// Decoder for gzip/zlib-compressed JSON payloads.
///
/// Decoding is a single linear pass:
///
///   1. **Clock**: take a monotonic start timestamp.
///   2. **Inflate**: auto-detect gzip or zlib from the leading bytes
///      and inflate, bounded by
///      [`DecodeConfig::max_decompressed_size`].
///   3. **Text**: interpret the inflated bytes as UTF-8.
///   4. **Parse**: parse the text as a JSON value.
///   5. **Count**: record the array length if the value is an array.
///
/// No partial result is ever returned: any failure aborts the pass
/// with a [`DecodeError`].
///
/// # Example
///
/// ```rust
/// use recload_codec::{PayloadDecoder, PayloadEncoder};
/// use serde_json::json;
///
/// let records = json!([{"a": 1}, {"a": 2}, {"a": 3}]);
/// let payload = PayloadEncoder::default().encode(&records).unwrap();
///
/// let decoded = PayloadDecoder::default().decode(&payload.bytes).unwrap();
/// assert_eq!(decoded.data, records);
/// assert_eq!(decoded.record_count, Some(3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PayloadDecoder {
    config: DecodeConfig,
}

impl PayloadDecoder {
    #[must_use]
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Inflate and parse `buffer`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EmptyInput`] if `buffer` is empty.
    /// - [`DecodeError::UnrecognizedFormat`] if `buffer` is not compressed.
    /// - [`DecodeError::DecompressFailed`] if the stream is not valid
    ///   gzip or zlib.
    /// - [`DecodeError::DecompressionBomb`] if the inflated text exceeds
    ///   the configured limit.
    /// - [`DecodeError::InvalidUtf8`] if the inflated bytes are not text.
    /// - [`DecodeError::Parse`] if the text is not valid JSON.
    pub fn decode(&self, buffer: &[u8]) -> Result<DecodedPayload, DecodeError> {
        let start = Instant::now();
        let format = CompressionFormat::detect(buffer);

        let inflated = compression::decompress(buffer, self.config.max_decompressed_size)?;
        let decompressed_size = inflated.len();
        tracing::debug!(%format, compressed = buffer.len(), decompressed = decompressed_size, "inflated payload");

        let text = String::from_utf8(inflated)?;
        let data: Value = serde_json::from_str(&text)?;
        let record_count = record_count(&data);

        let elapsed = start.elapsed();
        tracing::debug!(?record_count, elapsed_ms = elapsed.as_secs_f64() * 1e3, "parsed payload");

        Ok(DecodedPayload {
            data,
            record_count,
            elapsed,
            format,
            compressed_size: buffer.len(),
            decompressed_size,
        })
    }
}

/// Length of `value` if it is a JSON array.
#[must_use]
pub fn record_count(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::compress;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn gzip(text: &str) -> Vec<u8> {
        compress(text.as_bytes(), CompressionFormat::Gzip, 9).unwrap()
    }

    #[test]
    fn decodes_array_of_records() {
        let payload = gzip(r#"[{"a":1},{"a":2},{"a":3}]"#);
        let decoded = PayloadDecoder::default().decode(&payload).unwrap();

        assert_eq!(decoded.data, json!([{"a": 1}, {"a": 2}, {"a": 3}]));
        assert_eq!(decoded.record_count, Some(3));
        assert_eq!(decoded.format, CompressionFormat::Gzip);
        assert_eq!(decoded.compressed_size, payload.len());
        assert_eq!(decoded.decompressed_size, 25);
        assert!(decoded.load_time_secs() >= 0.0);
        assert!(decoded.load_time_secs().is_finite());
    }

    #[test]
    fn object_has_no_record_count() {
        let decoded = PayloadDecoder::default()
            .decode(&gzip(r#"{"records":[1,2,3]}"#))
            .unwrap();
        assert_eq!(decoded.record_count, None);
    }

    #[test]
    fn scalars_have_no_record_count() {
        for text in ["42", "\"text\"", "null", "true"] {
            let decoded = PayloadDecoder::default().decode(&gzip(text)).unwrap();
            assert_eq!(decoded.record_count, None, "{text}");
        }
    }

    #[test]
    fn empty_array_counts_zero() {
        let decoded = PayloadDecoder::default().decode(&gzip("[]")).unwrap();
        assert_eq!(decoded.record_count, Some(0));
    }

    #[test]
    fn zlib_payloads_are_accepted() {
        let payload = compress(b"[true,false]", CompressionFormat::Zlib, 6).unwrap();
        let decoded = PayloadDecoder::default().decode(&payload).unwrap();
        assert_eq!(decoded.format, CompressionFormat::Zlib);
        assert_eq!(decoded.record_count, Some(2));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PayloadDecoder::default().decode(&gzip("{not json")).unwrap_err();
        assert!(matches!(err, DecodeError::Parse(_)));
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn empty_text_is_a_parse_error() {
        let err = PayloadDecoder::default().decode(&gzip("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn corrupt_stream_is_a_decompression_error() {
        let err = PayloadDecoder::default()
            .decode(b"definitely not compressed")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decompression);
    }

    #[test]
    fn non_utf8_text_is_a_decompression_error() {
        let payload = compress(&[0xff, 0xfe, 0x5b, 0x5d], CompressionFormat::Gzip, 9).unwrap();
        let err = PayloadDecoder::default().decode(&payload).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
        assert_eq!(err.kind(), ErrorKind::Decompression);
    }

    #[test]
    fn limit_comes_from_config() {
        let decoder = PayloadDecoder::new(DecodeConfig::default().with_max_decompressed_size(8));
        let err = decoder.decode(&gzip("[1,2,3,4,5,6,7,8,9]")).unwrap_err();
        assert!(matches!(err, DecodeError::DecompressionBomb { limit: 8, .. }));
    }
}
