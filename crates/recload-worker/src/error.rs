/// Errors raised by the background dispatch layer itself, as opposed to
/// a failed decode (which is an ordinary [`DecodeResponse::Failure`]).
///
/// ```text
///   WorkerError
///   ├── Closed          ← worker inbox closed, request never accepted
///   ├── ReplyDropped    ← worker accepted the request but never answered
///   └── Join(JoinError) ← worker task panicked or was cancelled
/// ```
///
/// [`DecodeResponse::Failure`]: crate::DecodeResponse::Failure
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("decode worker is not accepting requests")]
    Closed,

    #[error("decode worker dropped the request without replying")]
    ReplyDropped,

    #[error("decode worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A wire message that violates the success/failure exclusivity rule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResponseShapeError {
    #[error("success response carries failure field `{0}`")]
    FailureFieldOnSuccess(&'static str),

    #[error("success response is missing `data`")]
    MissingData,

    #[error("success response is missing `loadTime`")]
    MissingLoadTime,

    #[error("success response has a negative or non-finite `loadTime`")]
    InvalidLoadTime,

    #[error("failure response carries success field `{0}`")]
    SuccessFieldOnFailure(&'static str),

    #[error("failure response is missing `error`")]
    MissingError,
}
