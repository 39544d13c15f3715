/// Implementation of `recload encode`.
///
/// Reads a JSON file, or a CSV file turned into one record per row (see
/// [`crate::csv_records`]), re-serializes it compactly, and compresses it
/// with [`PayloadEncoder`]. The output defaults to `<input stem>.json.gz`
/// next to the input file.
///
/// # Example output
///
/// ```text
/// Input:       accidents.csv
/// Output:      accidents.json.gz  (gzip, level 9)
/// CSV rows:    182311 read, 267 skipped
/// Records:     182044
/// JSON size:   41.27 MB
/// Compressed:  6.02 MB
/// Saved:       85.4%
/// ```
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recload_codec::{CompressionFormat, EncodeConfig, PayloadEncoder, record_count};
use serde_json::Value;

use crate::EncodeArgs;
use crate::csv_records::{self, CsvOptions, CsvRecords};

/// Run the `recload encode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not valid JSON or
/// CSV, the level is out of range, or the output cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let (value, csv_rows) = if is_csv(args) {
        let read = read_csv(args)?;
        let counts = (read.rows, read.skipped());
        (Value::Array(read.records), Some(counts))
    } else {
        (read_json(&args.input)?, None)
    };

    let format = if args.zlib {
        CompressionFormat::Zlib
    } else {
        CompressionFormat::Gzip
    };
    let encoder = PayloadEncoder::new(EncodeConfig::default().with_format(format).with_level(args.level));
    let payload = encoder
        .encode(&value)
        .with_context(|| format!("cannot encode {}", args.input.display()))?;

    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input));
    fs::write(&output, &payload.bytes)
        .with_context(|| format!("cannot write {}", output.display()))?;
    tracing::debug!(output = %output.display(), bytes = payload.compressed_size(), "wrote payload");

    println!("Input:       {}", args.input.display());
    println!("Output:      {}  ({format}, level {})", output.display(), args.level);
    if let Some((rows, skipped)) = csv_rows {
        println!("CSV rows:    {rows} read, {skipped} skipped");
    }
    if let Some(count) = record_count(&value) {
        println!("Records:     {count}");
    }
    println!("JSON size:   {}", megabytes(payload.json_size));
    println!("Compressed:  {}", megabytes(payload.compressed_size()));
    println!("Saved:       {:.1}%", payload.savings() * 100.0);

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_slice(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn read_csv(args: &EncodeArgs) -> Result<CsvRecords> {
    let file = fs::File::open(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let options = CsvOptions {
        required: args.require.clone(),
        decimals: args.decimals,
    };
    csv_records::read_records(file, &options)
        .with_context(|| format!("{} is not valid CSV", args.input.display()))
}

/// `--csv`, or an input file ending in `.csv`.
fn is_csv(args: &EncodeArgs) -> bool {
    args.csv
        || args
            .input
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// `data/accidents.json` → `data/accidents.json.gz`.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "payload".into(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}.json.gz"))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn megabytes(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
