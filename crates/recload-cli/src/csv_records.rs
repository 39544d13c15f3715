/// CSV intake for `recload encode`.
///
/// The first row is the header. Every following row becomes one JSON
/// object keyed by the header names:
///
/// ```text
/// latitude,longitude,year,VNaselju        [
/// 46.0512349,14.5,2019,DA          →        {"VNaselju":"DA","latitude":46.051235,
/// ,14.6,2020,NE                              "longitude":14.5,"year":2019}
///                                         ]
/// ```
///
/// Cells are kept as strings, except in the required columns. Those must
/// hold a finite number. Integers stay integers, and fractional values are
/// rounded to the configured number of decimals. A row whose required cell
/// is empty or not a number is skipped and counted (the second row above).
use std::io::Read;

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use serde_json::{Map, Number, Value};

/// Row interval between progress events.
const PROGRESS_EVERY: usize = 10_000;

/// Options for [`read_records`].
#[derive(Clone, Debug, Default)]
pub struct CsvOptions {
    /// Columns that must hold a number in every kept row.
    pub required: Vec<String>,
    /// Decimal places kept for fractional values in required columns.
    pub decimals: u8,
}

/// Records read from a CSV file.
#[derive(Debug)]
pub struct CsvRecords {
    pub records: Vec<Value>,
    /// Data rows read, excluding the header.
    pub rows: usize,
}

impl CsvRecords {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.rows - self.records.len()
    }
}

/// Read every row of a headed CSV document into JSON objects.
///
/// # Errors
///
/// Returns an error if the header row cannot be read, a required column is
/// missing from it, or a row is not valid UTF-8.
pub fn read_records<R: Read>(reader: R, options: &CsvOptions) -> Result<CsvRecords> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().context("cannot read CSV header row")?.clone();
    for column in &options.required {
        if !headers.iter().any(|name| name == column) {
            bail!("required column `{column}` is not in the CSV header");
        }
    }

    let mut records = Vec::new();
    let mut rows = 0;
    for row in reader.records() {
        let row = row.context("malformed CSV row")?;
        rows += 1;
        if rows % PROGRESS_EVERY == 0 {
            tracing::debug!(rows, kept = records.len(), "reading CSV");
        }
        if let Some(record) = to_record(&headers, &row, options) {
            records.push(record);
        }
    }

    tracing::debug!(rows, kept = records.len(), "finished CSV");
    Ok(CsvRecords { records, rows })
}

// Missing trailing cells read as empty strings.
fn to_record(headers: &StringRecord, row: &StringRecord, options: &CsvOptions) -> Option<Value> {
    let mut object = Map::new();
    for (index, name) in headers.iter().enumerate() {
        let cell = row.get(index).unwrap_or_default();
        let value = if options.required.iter().any(|column| column == name) {
            parse_number(cell, options.decimals)?
        } else {
            Value::String(cell.to_owned())
        };
        object.insert(name.to_owned(), value);
    }
    Some(Value::Object(object))
}

fn parse_number(cell: &str, decimals: u8) -> Option<Value> {
    let cell = cell.trim();
    if let Ok(int) = cell.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float: f64 = cell.parse().ok()?;
    let scale = 10f64.powi(i32::from(decimals));
    Number::from_f64((float * scale).round() / scale).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(required: &[&str]) -> CsvOptions {
        CsvOptions {
            required: required.iter().map(ToString::to_string).collect(),
            decimals: 6,
        }
    }

    #[test]
    fn rows_become_objects_keyed_by_header() {
        let text = "name,city\nAna,Ljubljana\nBor,Maribor\n";
        let read = read_records(text.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(
            Value::Array(read.records),
            json!([{"name": "Ana", "city": "Ljubljana"}, {"name": "Bor", "city": "Maribor"}])
        );
        assert_eq!(read.rows, 2);
    }

    #[test]
    fn required_columns_are_numbers() {
        let text = "latitude,longitude,year,VNaselju\n46.0512349,14.5,2019,DA\n";
        let read = read_records(text.as_bytes(), &options(&["latitude", "longitude", "year"])).unwrap();
        assert_eq!(
            read.records,
            [json!({"latitude": 46.051_235, "longitude": 14.5, "year": 2019, "VNaselju": "DA"})]
        );
    }

    #[test]
    fn unparsable_rows_are_skipped_and_counted() {
        let text = "latitude,longitude,year\n\
                    46.05,14.5,2019\n\
                    ,14.6,2020\n\
                    46.1,abc,2021\n\
                    46.2,14.7,NaN\n\
                    46.3,14.8\n\
                    46.4,14.9,2022\n";
        let read = read_records(text.as_bytes(), &options(&["latitude", "longitude", "year"])).unwrap();
        assert_eq!(read.rows, 6);
        assert_eq!(read.records.len(), 2);
        assert_eq!(read.skipped(), 4);
        assert_eq!(read.records[1]["year"], json!(2022));
    }

    #[test]
    fn short_rows_pad_with_empty_strings() {
        let read = read_records("a,b,c\n1,2\n".as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(read.records, [json!({"a": "1", "b": "2", "c": ""})]);
    }

    #[test]
    fn decimals_control_rounding() {
        let opts = CsvOptions {
            required: vec!["x".into()],
            decimals: 2,
        };
        let read = read_records("x\n1.23456\n".as_bytes(), &opts).unwrap();
        assert_eq!(read.records, [json!({"x": 1.23})]);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = read_records("a,b\n1,2\n".as_bytes(), &options(&["latitude"])).unwrap_err();
        assert!(err.to_string().contains("latitude"), "{err}");
    }

    #[test]
    fn header_only_file_has_no_records() {
        let read = read_records("a,b\n".as_bytes(), &options(&["a"])).unwrap();
        assert_eq!(read.rows, 0);
        assert!(read.records.is_empty());
    }
}
