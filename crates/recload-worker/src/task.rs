use recload_codec::{DecodeConfig, ErrorKind, PayloadDecoder};

use crate::message::{DecodeRequest, DecodeResponse};

/// A single-request decode job: one buffer in, one response out.
///
/// ```text
///   Idle ──(request)──▶ Running ──(response)──▶ Idle
/// ```
///
/// [`run`](Self::run) decodes on the calling thread.
/// [`dispatch`](Self::dispatch) moves the work to tokio's blocking pool
/// and suspends the caller until the single response is ready, so the
/// caller's executor thread is never tied up by inflate or parse.
///
/// Every outcome, including a panic inside the decoder, is folded into a
/// [`DecodeResponse`]; nothing escapes the task boundary. There is no
/// retry, no timeout, and no cancellation once a request is running.
///
/// # Example
///
/// ```rust,no_run
/// use recload_worker::{DecodeRequest, DecodeTask};
///
/// async fn load(buffer: Vec<u8>) {
///     let response = DecodeTask::default().dispatch(DecodeRequest::new(buffer)).await;
///     if let Some(data) = response.data() {
///         println!("{data}");
///     }
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecodeTask {
    decoder: PayloadDecoder,
}

impl DecodeTask {
    #[must_use]
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            decoder: PayloadDecoder::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DecodeConfig {
        self.decoder.config()
    }

    /// Decode `request` synchronously on the current thread.
    #[must_use]
    pub fn run(&self, request: DecodeRequest) -> DecodeResponse {
        let span = tracing::debug_span!("decode_task", bytes = request.len());
        let _guard = span.enter();

        let response = DecodeResponse::from(self.decoder.decode(&request.array_buffer));
        match &response {
            DecodeResponse::Success {
                load_time,
                record_count,
                ..
            } => tracing::debug!(load_time, ?record_count, "decode succeeded"),
            DecodeResponse::Failure { error, kind } => {
                tracing::warn!(?kind, %error, "decode failed");
            }
        }
        response
    }

    /// Decode `request` on the blocking thread pool.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn dispatch(&self, request: DecodeRequest) -> DecodeResponse {
        let task = self.clone();
        match tokio::task::spawn_blocking(move || task.run(request)).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%err, "decode task did not complete");
                let reason = if err.is_panic() {
                    "decode task panicked"
                } else {
                    "decode task was cancelled"
                };
                DecodeResponse::failure(ErrorKind::Internal, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use serde_json::json;
    use std::io::Write;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn run_reports_success() {
        let response = DecodeTask::default().run(DecodeRequest::new(gzip(r#"[{"a":1},{"a":2},{"a":3}]"#)));
        match response {
            DecodeResponse::Success {
                data,
                load_time,
                record_count,
            } => {
                assert_eq!(data, json!([{"a": 1}, {"a": 2}, {"a": 3}]));
                assert!(load_time.is_finite() && load_time >= 0.0);
                assert_eq!(record_count, Some(3));
            }
            DecodeResponse::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[test]
    fn run_reports_corrupt_input() {
        let response = DecodeTask::default().run(DecodeRequest::new(b"\x1f\x8bgarbage".to_vec()));
        assert!(matches!(
            &response,
            DecodeResponse::Failure { kind: ErrorKind::Decompression, error } if !error.is_empty()
        ));
    }

    #[test]
    fn run_reports_malformed_json() {
        let response = DecodeTask::default().run(DecodeRequest::new(gzip("{not json")));
        assert!(matches!(
            &response,
            DecodeResponse::Failure { kind: ErrorKind::Parse, error } if !error.is_empty()
        ));
    }

    #[test]
    fn run_honours_size_limit() {
        let task = DecodeTask::new(DecodeConfig::default().with_max_decompressed_size(4));
        let response = task.run(DecodeRequest::new(gzip("[1,2,3,4,5]")));
        assert!(matches!(response, DecodeResponse::Failure { kind: ErrorKind::Decompression, .. }));
    }

    #[tokio::test]
    async fn dispatch_matches_run() {
        let task = DecodeTask::default();
        let payload = gzip(r#"{"year":2024}"#);

        let response = task.dispatch(DecodeRequest::new(payload)).await;
        assert_eq!(response.data(), Some(&json!({"year": 2024})));
        assert!(matches!(response, DecodeResponse::Success { record_count: None, .. }));
    }

    #[tokio::test]
    async fn dispatch_reports_empty_buffer() {
        let response = DecodeTask::default().dispatch(DecodeRequest::new(Vec::new())).await;
        assert!(!response.is_success());
        assert!(!response.error().unwrap().is_empty());
    }
}
