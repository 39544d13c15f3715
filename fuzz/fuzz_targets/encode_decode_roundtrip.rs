#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use recload_codec::{CompressionFormat, EncodeConfig, PayloadDecoder, PayloadEncoder};
use serde_json::{Map, Value};

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Array(Vec<FuzzValue>),
    Object(Vec<(String, FuzzValue)>),
}

impl FuzzValue {
    fn into_json(self, depth: usize) -> Value {
        if depth > 16 {
            return Value::Null;
        }
        match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Int(i) => Value::from(i),
            FuzzValue::Text(s) => Value::String(s),
            FuzzValue::Array(items) => {
                Value::Array(items.into_iter().map(|v| v.into_json(depth + 1)).collect())
            }
            FuzzValue::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json(depth + 1)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    value: FuzzValue,
    level: u8,
    zlib: bool,
}

// Fuzz target: encode an arbitrary JSON tree, decode it, compare.
fuzz_target!(|input: Input| {
    let value = input.value.into_json(0);
    let format = if input.zlib {
        CompressionFormat::Zlib
    } else {
        CompressionFormat::Gzip
    };
    let config = EncodeConfig::default()
        .with_format(format)
        .with_level(u32::from(input.level % 10));

    let payload = PayloadEncoder::new(config).encode(&value).expect("encode");
    let decoded = PayloadDecoder::default().decode(&payload.bytes).expect("decode");

    assert_eq!(decoded.data, value);
    assert_eq!(decoded.record_count, value.as_array().map(Vec::len));
});
