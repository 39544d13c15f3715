use crate::compression::CompressionFormat;

/// Default upper bound on inflated payload size: 1 GiB.
///
/// Record datasets shipped to the decoder are typically tens of MiB
/// inflated; the limit only exists to stop decompression bombs.
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 1024 * 1024 * 1024;

/// Default DEFLATE level for produced payloads (smallest output).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Configuration for [`PayloadDecoder`](crate::PayloadDecoder).
///
/// ```text
/// ┌───────────────────────┬──────────────────────────────────────────┐
/// │ Field                 │ Purpose                                  │
/// ├───────────────────────┼──────────────────────────────────────────┤
/// │ max_decompressed_size │ Inflated-size ceiling (bomb protection)  │
/// └───────────────────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum number of bytes the inflate step may produce.
    pub max_decompressed_size: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl DecodeConfig {
    #[must_use]
    pub fn with_max_decompressed_size(mut self, limit: usize) -> Self {
        self.max_decompressed_size = limit;
        self
    }
}

/// Configuration for [`PayloadEncoder`](crate::PayloadEncoder).
///
/// ```text
/// ┌────────┬──────────────────────────────────────────────┐
/// │ Field  │ Purpose                                      │
/// ├────────┼──────────────────────────────────────────────┤
/// │ format │ Gzip (default) or zlib container             │
/// │ level  │ DEFLATE level 0-9 (default 9)                │
/// └────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    pub format: CompressionFormat,
    pub level: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            format: CompressionFormat::Gzip,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl EncodeConfig {
    #[must_use]
    pub fn with_format(mut self, format: CompressionFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}
