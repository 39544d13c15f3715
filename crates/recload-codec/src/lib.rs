#![warn(clippy::pedantic)]

pub mod compression;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use compression::CompressionFormat;
pub use config::{DecodeConfig, EncodeConfig};
pub use decoder::{DecodedPayload, PayloadDecoder, record_count};
pub use encoder::{EncodedPayload, PayloadEncoder};
pub use error::{DecodeError, EncodeError, ErrorKind};
