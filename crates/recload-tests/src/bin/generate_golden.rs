//! Golden fixture generator for the recload conformance test suite.
//!
//! This binary (re)creates every fixture file under `tests/golden/`. Run it
//! after changing the encoder defaults; the conformance tests only decode
//! the fixtures, so any valid stream with the same content passes.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p recload-tests
//! ```
//!
//! # Generated fixtures
//!
//! | File                      | Contents                                  |
//! |---------------------------|-------------------------------------------|
//! | records.json.gz           | Three accident records (gzip, level 9)    |
//! | records.zlib              | Same records as a zlib stream             |
//! | object.json.gz            | A single JSON object                      |
//! | scalar.json.gz            | The number `42`                           |
//! | malformed.json.gz         | Valid gzip of `{not json`                 |
//! | truncated.json.gz         | First half of `records.json.gz`           |
//! | corrupt.bin               | Plain text, never compressed              |

#![allow(clippy::pedantic)]

use std::path::Path;

use recload_codec::{CompressionFormat, EncodeConfig, PayloadEncoder};
use serde_json::json;

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");
    std::fs::create_dir_all(&golden_dir).expect("create golden dir");

    let records = json!([
        {
            "latitude": 46.056946, "longitude": 14.505751, "year": 2019,
            "KlasifikacijaNesrece": "Z MATERIALNO ŠKODO", "TipNesrece": "NALETNO VOŽNJA",
            "DatumPN": "14.03.2019", "UraPN": "7.15"
        },
        {
            "latitude": 46.239749, "longitude": 15.267706, "year": 2021,
            "KlasifikacijaNesrece": "Z LAŽJO TELESNO POŠKODBO", "TipNesrece": "BOČNO TRČENJE",
            "DatumPN": "02.11.2021", "UraPN": "16.40"
        },
        {
            "latitude": 45.548059, "longitude": 13.730187, "year": 2024,
            "KlasifikacijaNesrece": "Z MATERIALNO ŠKODO", "TipNesrece": "OPLAŽENJE",
            "DatumPN": "28.07.2024", "UraPN": "22.05"
        }
    ]);

    let gzip = PayloadEncoder::default();
    let zlib = PayloadEncoder::new(EncodeConfig::default().with_format(CompressionFormat::Zlib));

    let records_gz = gzip.encode(&records).expect("encode records").bytes;
    write(&golden_dir, "records.json.gz", &records_gz);
    write(
        &golden_dir,
        "records.zlib",
        &zlib.encode(&records).expect("encode records").bytes,
    );
    write(
        &golden_dir,
        "object.json.gz",
        &gzip
            .encode(&json!({"source": "policija.si", "years": [2015, 2024]}))
            .expect("encode object")
            .bytes,
    );
    write(
        &golden_dir,
        "scalar.json.gz",
        &gzip.encode(&json!(42)).expect("encode scalar").bytes,
    );
    write(
        &golden_dir,
        "malformed.json.gz",
        &gzip.encode_text(b"{not json").expect("encode text").bytes,
    );
    write(
        &golden_dir,
        "truncated.json.gz",
        &records_gz[..records_gz.len() / 2],
    );
    write(&golden_dir, "corrupt.bin", b"this payload was never compressed\n");

    println!("All golden fixtures written to {}", golden_dir.display());
}

fn write(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    println!("  {name} ({} bytes)", bytes.len());
}
