use std::fmt;
use std::io::{Read, Write};

use flate2::bufread::GzDecoder;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::{DecodeError, EncodeError};

/// The two leading bytes of every gzip member (RFC 1952 §2.3.1).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Highest compression level accepted by the encoder.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Output buffer growth step for the zlib inflate loop.
const INFLATE_CHUNK: usize = 64 * 1024;

/// Upper bound on the output buffer reserved before inflating anything.
const MAX_INITIAL_CAPACITY: usize = 16 * 1024 * 1024;

/// Container format wrapped around a DEFLATE stream.
///
/// ```text
/// ┌────────┬──────────────────────┬───────────────────────────────┐
/// │ Format │ Leading bytes        │ Trailer                       │
/// ├────────┼──────────────────────┼───────────────────────────────┤
/// │ Gzip   │ 1f 8b                │ CRC-32 + ISIZE (8 bytes)      │
/// │ Zlib   │ CMF FLG (e.g. 78 9c) │ Adler-32 (4 bytes)            │
/// └────────┴──────────────────────┴───────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompressionFormat {
    #[default]
    Gzip,
    Zlib,
}

impl CompressionFormat {
    /// Detect the container format from the leading bytes.
    ///
    /// Anything that does not start with the gzip magic is treated as
    /// zlib; [`decompress`] then rejects data without a valid zlib header.
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else {
            Self::Zlib
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gzip => f.write_str("gzip"),
            Self::Zlib => f.write_str("zlib"),
        }
    }
}

/// Inflate a gzip or zlib stream, auto-detecting which one it is.
///
/// The `max_size` parameter bounds the inflated output. Once the limit
/// is crossed inflation stops and [`DecodeError::DecompressionBomb`] is
/// returned, so a tiny hostile payload cannot exhaust memory.
///
/// # Errors
///
/// - [`DecodeError::EmptyInput`] if `data` is empty.
/// - [`DecodeError::UnrecognizedFormat`] if `data` carries neither a gzip
///   nor a zlib header.
/// - [`DecodeError::DecompressFailed`] if the stream is corrupt, truncated,
///   or followed by trailing bytes that are not another gzip member.
/// - [`DecodeError::DecompressionBomb`] if the output exceeds `max_size`.
pub fn decompress(data: &[u8], max_size: usize) -> Result<Vec<u8>, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    match CompressionFormat::detect(data) {
        CompressionFormat::Gzip => inflate_gzip(data, max_size),
        CompressionFormat::Zlib => inflate_zlib(data, max_size),
    }
}

// A gzip file may hold several members back to back (RFC 1952 §2.2), as
// written by `cat a.gz b.gz`, pigz, or bgzip. Their contents concatenate.
// NUL padding between or after members is skipped; any other trailing
// bytes are an error.
fn inflate_gzip(data: &[u8], max_size: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(initial_capacity(data.len(), max_size));
    let mut rest = data;

    while !rest.is_empty() {
        if !rest.starts_with(&GZIP_MAGIC) {
            return Err(DecodeError::DecompressFailed {
                format: CompressionFormat::Gzip,
                reason: format!("{} bytes of trailing data after the last member", rest.len()),
            });
        }

        let budget = max_size.saturating_sub(out.len());
        let limit = u64::try_from(budget).unwrap_or(u64::MAX).saturating_add(1);
        let mut member = GzDecoder::new(rest);
        member
            .by_ref()
            .take(limit)
            .read_to_end(&mut out)
            .map_err(|e| decompress_failed(CompressionFormat::Gzip, &e))?;

        out = check_limit(out, max_size)?;
        rest = member.into_inner();
        let padding = rest.iter().take_while(|&&b| b == 0).count();
        rest = &rest[padding..];
    }

    Ok(out)
}

// The streaming `read::ZlibDecoder` reports a truncated stream as a clean
// EOF, so drive the inflater directly and insist on `StreamEnd`.
fn inflate_zlib(data: &[u8], max_size: usize) -> Result<Vec<u8>, DecodeError> {
    if !has_zlib_header(data) {
        return Err(DecodeError::UnrecognizedFormat);
    }

    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(initial_capacity(data.len(), max_size));

    loop {
        if out.len() == out.capacity() {
            out.reserve(INFLATE_CHUNK);
        }

        #[allow(clippy::cast_possible_truncation)]
        let consumed = inflater.total_in() as usize;
        let produced_before = out.len();

        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| decompress_failed(CompressionFormat::Zlib, &e))?;

        if out.len() > max_size {
            return Err(DecodeError::DecompressionBomb {
                actual: out.len(),
                limit: max_size,
            });
        }

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                #[allow(clippy::cast_possible_truncation)]
                let stalled = inflater.total_in() as usize == consumed && out.len() == produced_before;
                if stalled {
                    return Err(DecodeError::DecompressFailed {
                        format: CompressionFormat::Zlib,
                        reason: "unexpected end of stream".to_string(),
                    });
                }
            }
        }
    }
}

/// RFC 1950 §2.2: deflate method, a window of at most 32 KiB, and a
/// header checksum that makes `CMF * 256 + FLG` a multiple of 31.
fn has_zlib_header(data: &[u8]) -> bool {
    let &[cmf, flg, ..] = data else {
        return false;
    };
    cmf & 0x0f == 8 && cmf >> 4 <= 7 && ((u16::from(cmf) << 8) | u16::from(flg)) % 31 == 0
}

fn check_limit(out: Vec<u8>, max_size: usize) -> Result<Vec<u8>, DecodeError> {
    if out.len() > max_size {
        return Err(DecodeError::DecompressionBomb {
            actual: out.len(),
            limit: max_size,
        });
    }
    Ok(out)
}

// A guess from the input size, capped so that a large hostile input does
// not reserve the whole limit before inflating a single byte.
fn initial_capacity(input_len: usize, max_size: usize) -> usize {
    input_len
        .saturating_mul(4)
        .clamp(INFLATE_CHUNK, MAX_INITIAL_CAPACITY)
        .min(max_size)
}

fn decompress_failed(format: CompressionFormat, err: &dyn std::error::Error) -> DecodeError {
    DecodeError::DecompressFailed {
        format,
        reason: err.to_string(),
    }
}

/// Compress a byte slice into a gzip or zlib stream.
///
/// `level` follows the usual DEFLATE scale: 0 stores, 1 is fastest,
/// 9 is smallest.
///
/// # Errors
///
/// - [`EncodeError::InvalidLevel`] if `level` is above 9.
/// - [`EncodeError::Io`] if the encoder fails to flush.
///
/// # Example
///
/// ```rust
/// use recload_codec::compression::{compress, decompress, CompressionFormat};
///
/// let data = br#"[{"year":2019},{"year":2020}]"#;
/// let packed = compress(data, CompressionFormat::Gzip, 9).unwrap();
/// assert_eq!(decompress(&packed, 1024).unwrap(), data);
/// ```
pub fn compress(data: &[u8], format: CompressionFormat, level: u32) -> Result<Vec<u8>, EncodeError> {
    if level > MAX_COMPRESSION_LEVEL {
        return Err(EncodeError::InvalidLevel(level));
    }
    let level = Compression::new(level);

    let compressed = match format {
        CompressionFormat::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), level);
            encoder.write_all(data)?;
            encoder.finish()?
        }
        CompressionFormat::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), level);
            encoder.write_all(data)?;
            encoder.finish()?
        }
    };
    Ok(compressed)
}
