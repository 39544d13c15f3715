//! Conformance tests: golden fixture files decoded and compared against
//! insta snapshots of the outbound response message.
//!
//! Each test reads a pre-built payload from `tests/golden/`, runs it through
//! [`DecodeTask`], and serializes the response. `loadTime` is the only
//! non-deterministic field; it is checked for range and then pinned to `0.0`
//! before the snapshot comparison.
//!
//! Fixtures are produced by `src/bin/generate_golden.rs`. A snapshot diff
//! signals either a deliberate change to the message shape (accept via
//! `cargo insta review`) or an accidental regression.

use std::path::Path;

use insta::assert_snapshot;
use recload_worker::{DecodeRequest, DecodeResponse, DecodeTask, ErrorKind};
use serde_json::{Value, json};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn golden(name: &str) -> Vec<u8> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let path = manifest_dir.join("tests/golden").join(name);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()))
}

fn respond(name: &str) -> DecodeResponse {
    DecodeTask::default().run(DecodeRequest::new(golden(name)))
}

/// Serialize a success response with `loadTime` pinned to zero.
fn render_success(response: &DecodeResponse) -> String {
    let mut message = serde_json::to_value(response).expect("serialize response");
    let load_time = message["loadTime"].as_f64().expect("loadTime present");
    assert!(load_time.is_finite() && load_time >= 0.0, "loadTime = {load_time}");
    message["loadTime"] = json!(0.0);
    message.to_string()
}

// ── Success fixtures ──────────────────────────────────────────────────────────

#[test]
fn records_gzip() {
    let response = respond("records.json.gz");
    assert_snapshot!(render_success(&response), @r#"{"data":[{"DatumPN":"14.03.2019","KlasifikacijaNesrece":"Z MATERIALNO ŠKODO","TipNesrece":"NALETNO VOŽNJA","UraPN":"7.15","latitude":46.056946,"longitude":14.505751,"year":2019},{"DatumPN":"02.11.2021","KlasifikacijaNesrece":"Z LAŽJO TELESNO POŠKODBO","TipNesrece":"BOČNO TRČENJE","UraPN":"16.40","latitude":46.239749,"longitude":15.267706,"year":2021},{"DatumPN":"28.07.2024","KlasifikacijaNesrece":"Z MATERIALNO ŠKODO","TipNesrece":"OPLAŽENJE","UraPN":"22.05","latitude":45.548059,"longitude":13.730187,"year":2024}],"loadTime":0.0,"recordCount":3,"success":true}"#);
}

#[test]
fn records_zlib_matches_gzip() {
    let gzip = respond("records.json.gz");
    let zlib = respond("records.zlib");
    assert_eq!(render_success(&gzip), render_success(&zlib));
}

#[test]
fn object_has_no_record_count() {
    let response = respond("object.json.gz");
    assert_snapshot!(render_success(&response), @r#"{"data":{"source":"policija.si","years":[2015,2024]},"loadTime":0.0,"success":true}"#);
}

#[test]
fn scalar_has_no_record_count() {
    let response = respond("scalar.json.gz");
    assert_snapshot!(render_success(&response), @r#"{"data":42,"loadTime":0.0,"success":true}"#);
}

// ── Failure fixtures ──────────────────────────────────────────────────────────

/// Assert a failure message has exactly the failure keys and return its kind.
fn failure_kind(name: &str) -> String {
    let message = serde_json::to_value(respond(name)).expect("serialize response");
    let Value::Object(fields) = &message else {
        panic!("response is not an object: {message}");
    };
    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(keys, ["error", "errorKind", "success"], "{name}");
    assert_eq!(message["success"], json!(false));
    assert!(!message["error"].as_str().unwrap_or_default().is_empty());
    message["errorKind"].as_str().unwrap_or_default().to_string()
}

#[test]
fn malformed_json_fixture() {
    assert_eq!(failure_kind("malformed.json.gz"), "parse");
}

#[test]
fn truncated_fixture() {
    assert_eq!(failure_kind("truncated.json.gz"), "decompression");
}

#[test]
fn corrupt_fixture() {
    assert_eq!(failure_kind("corrupt.bin"), "decompression");
}

#[test]
fn malformed_json_message_names_the_parser() {
    match respond("malformed.json.gz") {
        DecodeResponse::Failure { error, kind } => {
            assert_eq!(kind, ErrorKind::Parse);
            assert!(error.starts_with("JSON parse error"), "{error}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
