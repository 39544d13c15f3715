use serde::{Deserialize, Serialize};

use crate::compression::CompressionFormat;

/// Errors that can occur while decoding a compressed record payload.
///
/// Decoding runs in two stages, inflate then JSON parse, and every
/// variant belongs to exactly one of them. [`DecodeError::kind`] reports
/// which stage failed so callers can tell the two apart without
/// inspecting the message text.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── EmptyInput               ← zero-length buffer            (decompression)
///   ├── UnrecognizedFormat       ← neither gzip nor zlib header  (decompression)
///   ├── DecompressFailed         ← corrupt / unsupported stream  (decompression)
///   ├── DecompressionBomb        ← inflated size over the limit  (decompression)
///   ├── InvalidUtf8              ← inflated bytes are not text   (decompression)
///   └── Parse(serde_json::Error) ← text is not valid JSON        (parse)
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The request buffer contained no bytes at all.
    #[error("compressed buffer is empty")]
    EmptyInput,

    /// The buffer starts with neither the gzip magic nor a valid zlib
    /// header, typically because it was never compressed.
    #[error("input is not a gzip or zlib stream")]
    UnrecognizedFormat,

    /// The inflate routine rejected the stream.
    ///
    /// Common causes: truncated input, a corrupt gzip header, a checksum
    /// mismatch, or trailing bytes after the last gzip member.
    #[error("{format} decompression failed: {reason}")]
    DecompressFailed {
        format: CompressionFormat,
        reason: String,
    },

    /// Inflated output exceeded the configured maximum.
    ///
    /// `actual` is a lower bound: inflation stops as soon as the limit
    /// is crossed.
    #[error("decompressed size {actual} exceeds limit {limit}")]
    DecompressionBomb { actual: usize, limit: usize },

    /// The inflated bytes are not valid UTF-8 text.
    #[error("decompressed data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The inflated text is not well-formed JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl DecodeError {
    /// The pipeline stage this error came from.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput
            | Self::UnrecognizedFormat
            | Self::DecompressFailed { .. }
            | Self::DecompressionBomb { .. }
            | Self::InvalidUtf8(_) => ErrorKind::Decompression,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Coarse classification of a failed decode, carried on the wire as
/// `errorKind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The buffer could not be inflated into UTF-8 text.
    Decompression,
    /// The inflated text was not valid JSON.
    Parse,
    /// The decode never produced an outcome (panicked or worker gone).
    Internal,
}

/// Errors that can occur while producing a compressed payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("compression level {0} is out of range (0-9)")]
    InvalidLevel(u32),

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
