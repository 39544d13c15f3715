#![no_main]

use libfuzzer_sys::fuzz_target;
use recload_worker::{DecodeConfig, DecodeRequest, DecodeResponse, DecodeTask};

// Fuzz target: full decode task entry point.
//
// Feeds arbitrary bytes to `DecodeTask::run` with a small inflate limit.
// Catches bugs in:
// - gzip / zlib format detection and the zlib header check
// - Multi-member gzip, NUL padding, and trailing data
// - The zlib inflate loop (truncation, stall detection)
// - Decompression bomb limiting
// - UTF-8 and JSON error mapping
fuzz_target!(|data: &[u8]| {
    let task = DecodeTask::new(DecodeConfig::default().with_max_decompressed_size(1 << 20));
    let response = task.run(DecodeRequest::new(data.to_vec()));
    if let DecodeResponse::Failure { error, .. } = &response {
        assert!(!error.is_empty());
    }
});
