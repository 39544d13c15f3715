/// Implementation of `recload stats`.
///
/// Decodes a payload synchronously with [`PayloadDecoder`] and prints a
/// size and timing report.
///
/// # Example output
///
/// ```text
/// File:          accidents.json.gz
/// Format:        gzip
/// Compressed:    6.02 MB  (6312961 bytes)
/// Decompressed:  41.27 MB  (43274310 bytes)
/// Ratio:         6.86x
/// Value:         array
/// Records:       182044
/// Load time:     0.412 s
/// ```
use std::fs;

use anyhow::{Context, Result};
use recload_codec::{DecodeConfig, PayloadDecoder};
use serde_json::Value;

use crate::StatsArgs;
use crate::cmd_encode::megabytes;

/// Run the `recload stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to decode.
pub fn run(args: &StatsArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let mut config = DecodeConfig::default();
    if let Some(limit) = args.max_size {
        config = config.with_max_decompressed_size(limit);
    }

    let decoded = PayloadDecoder::new(config)
        .decode(&bytes)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    tracing::debug!(file = %args.file.display(), "decoded for stats");

    println!("File:          {}", args.file.display());
    println!("Format:        {}", decoded.format);
    println!(
        "Compressed:    {}  ({} bytes)",
        megabytes(decoded.compressed_size),
        decoded.compressed_size
    );
    println!(
        "Decompressed:  {}  ({} bytes)",
        megabytes(decoded.decompressed_size),
        decoded.decompressed_size
    );
    println!("Ratio:         {:.2}x", decoded.expansion_ratio());
    println!("Value:         {}", value_label(&decoded.data));
    if let Some(count) = decoded.record_count {
        println!("Records:       {count}");
    }
    println!("Load time:     {:.3} s", decoded.load_time_secs());

    Ok(())
}

fn value_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
