use recload_codec::{DecodeError, DecodedPayload, ErrorKind};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{ResponseShapeError, WorkerError};

/// Inbound message: one compressed buffer, owned by the task until it
/// has been decoded.
///
/// On the wire:
///
/// ```text
/// { "arrayBuffer": [31, 139, 8, ...] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeRequest {
    pub array_buffer: Vec<u8>,
}

impl DecodeRequest {
    #[must_use]
    pub fn new(buffer: impl Into<Vec<u8>>) -> Self {
        Self {
            array_buffer: buffer.into(),
        }
    }

    /// Read an entire compressed buffer from `reader`.
    ///
    /// The whole stream is buffered before any decoding happens; the
    /// decoder never sees a partial payload.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from the reader.
    pub async fn from_reader<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        Ok(Self::new(buffer))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.array_buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array_buffer.is_empty()
    }
}

impl From<Vec<u8>> for DecodeRequest {
    fn from(buffer: Vec<u8>) -> Self {
        Self::new(buffer)
    }
}

/// Outbound message: exactly one of success or failure.
///
/// ```text
/// success: { "success": true,  "data": ..., "loadTime": 0.012, "recordCount": 3 }
/// failure: { "success": false, "error": "...", "errorKind": "parse" }
/// ```
///
/// `recordCount` is omitted when the decoded value is not an array.
/// Deserialization rejects messages that mix fields from both shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum DecodeResponse {
    Success {
        data: Value,
        /// Decode time in seconds; always finite and non-negative.
        load_time: f64,
        record_count: Option<usize>,
    },
    Failure {
        error: String,
        kind: ErrorKind,
    },
}

impl DecodeResponse {
    /// Build a failure response from any error's display text.
    #[must_use]
    pub fn failure(kind: ErrorKind, error: impl std::fmt::Display) -> Self {
        Self::Failure {
            error: error.to_string(),
            kind,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The decoded value, if this is a success.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The error message, if this is a failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

impl From<DecodedPayload> for DecodeResponse {
    fn from(payload: DecodedPayload) -> Self {
        Self::Success {
            load_time: payload.load_time_secs(),
            record_count: payload.record_count,
            data: payload.data,
        }
    }
}

impl From<DecodeError> for DecodeResponse {
    fn from(err: DecodeError) -> Self {
        Self::failure(err.kind(), err)
    }
}

impl From<Result<DecodedPayload, DecodeError>> for DecodeResponse {
    fn from(outcome: Result<DecodedPayload, DecodeError>) -> Self {
        match outcome {
            Ok(payload) => payload.into(),
            Err(err) => err.into(),
        }
    }
}

impl From<WorkerError> for DecodeResponse {
    fn from(err: WorkerError) -> Self {
        Self::failure(ErrorKind::Internal, err)
    }
}

/// Flat on-the-wire form of [`DecodeResponse`].
///
/// `data` is `None` only when the key is absent; `"data": null` arrives as
/// `Some(Value::Null)`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    success: bool,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    record_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl From<DecodeResponse> for WireResponse {
    fn from(response: DecodeResponse) -> Self {
        match response {
            DecodeResponse::Success {
                data,
                load_time,
                record_count,
            } => Self {
                success: true,
                data: Some(data),
                load_time: Some(load_time),
                record_count,
                error: None,
                error_kind: None,
            },
            DecodeResponse::Failure { error, kind } => Self {
                success: false,
                data: None,
                load_time: None,
                record_count: None,
                error: Some(error),
                error_kind: Some(kind),
            },
        }
    }
}

impl TryFrom<WireResponse> for DecodeResponse {
    type Error = ResponseShapeError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        if wire.success {
            if wire.error.is_some() {
                return Err(ResponseShapeError::FailureFieldOnSuccess("error"));
            }
            if wire.error_kind.is_some() {
                return Err(ResponseShapeError::FailureFieldOnSuccess("errorKind"));
            }
            let data = wire.data.ok_or(ResponseShapeError::MissingData)?;
            let load_time = wire.load_time.ok_or(ResponseShapeError::MissingLoadTime)?;
            if !load_time.is_finite() || load_time < 0.0 {
                return Err(ResponseShapeError::InvalidLoadTime);
            }
            Ok(Self::Success {
                data,
                load_time,
                record_count: wire.record_count,
            })
        } else {
            if wire.data.is_some() {
                return Err(ResponseShapeError::SuccessFieldOnFailure("data"));
            }
            if wire.load_time.is_some() {
                return Err(ResponseShapeError::SuccessFieldOnFailure("loadTime"));
            }
            if wire.record_count.is_some() {
                return Err(ResponseShapeError::SuccessFieldOnFailure("recordCount"));
            }
            let error = wire.error.ok_or(ResponseShapeError::MissingError)?;
            Ok(Self::Failure {
                error,
                kind: wire.error_kind.unwrap_or(ErrorKind::Internal),
            })
        }
    }
}
