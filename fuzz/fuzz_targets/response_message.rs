#![no_main]

use libfuzzer_sys::fuzz_target;
use recload_worker::DecodeResponse;

// Fuzz target: outbound message deserializer.
//
// Any message that deserializes must re-serialize into a message that
// deserializes to the same shape.
fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<DecodeResponse>(data) {
        let text = serde_json::to_string(&response).expect("re-serialize");
        let again: DecodeResponse = serde_json::from_str(&text).expect("re-parse");
        assert_eq!(response.is_success(), again.is_success());
        assert_eq!(response.error(), again.error());
    }
});
