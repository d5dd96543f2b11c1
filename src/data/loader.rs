use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{InsuranceDataset, Record, Smoker};

/// Columns every input file must provide. Other columns (e.g. `sex`) are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["age", "bmi", "children", "smoker", "region", "charges"];

/// Structural problems with an input file.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("row {row}: invalid smoker flag '{value}' (expected yes/no)")]
    InvalidSmoker { row: usize, value: String },

    #[error("dataset contains no records")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the insurance dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one policyholder per line
/// * `.json`    – `[{ "age": 19, "bmi": 27.9, ... }, ...]`
/// * `.parquet` – flat columns named after [`REQUIRED_COLUMNS`]
///
/// Loading is all-or-nothing: any error means no dataset.
pub fn load_file(path: &Path) -> Result<InsuranceDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(SchemaError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let dataset = InsuranceDataset::from_records(records);
    if dataset.is_empty() {
        return Err(anyhow::Error::new(SchemaError::Empty))
            .with_context(|| format!("loading {}", path.display()));
    }
    Ok(dataset)
}

fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), SchemaError> {
    let present: Vec<&str> = present.into_iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

/// Row shape shared by the CSV and JSON readers.
#[derive(Debug, Deserialize)]
struct RecordRow {
    age: u32,
    bmi: f64,
    children: u32,
    smoker: String,
    region: String,
    charges: f64,
}

impl RecordRow {
    fn into_record(self, row: usize) -> Result<Record, SchemaError> {
        let smoker = Smoker::parse(&self.smoker).ok_or(SchemaError::InvalidSmoker {
            row,
            value: self.smoker.clone(),
        })?;
        Ok(Record::new(
            self.age,
            self.bmi,
            self.children,
            smoker,
            self.region,
            self.charges,
        ))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    // Trimmed here so `age, bmi` headers also reach the serde field names.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(headers.iter())?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RecordRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record(row_no)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        check_columns(obj.keys().map(String::as_str)).with_context(|| format!("Row {i}"))?;

        let parsed: RecordRow =
            serde_json::from_value(row.clone()).with_context(|| format!("Row {i}"))?;
        records.push(parsed.into_record(i)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Flat schema, one column per field. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    check_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let age = column(&batch, "age")?;
        let bmi = column(&batch, "bmi")?;
        let children = column(&batch, "children")?;
        let smoker_col = column(&batch, "smoker")?;
        let region = column(&batch, "region")?;
        let charges = column(&batch, "charges")?;

        for row in 0..batch.num_rows() {
            let at = offset + row;
            let smoker = match extract_bool(smoker_col, row) {
                Some(b) => Smoker::from(b),
                None => {
                    let text = extract_str(smoker_col, row)
                        .with_context(|| format!("Row {at}: failed to read 'smoker'"))?;
                    Smoker::parse(&text).ok_or(SchemaError::InvalidSmoker { row: at, value: text })?
                }
            };

            records.push(Record::new(
                extract_u32(age, row).with_context(|| format!("Row {at}: failed to read 'age'"))?,
                extract_f64(bmi, row).with_context(|| format!("Row {at}: failed to read 'bmi'"))?,
                extract_u32(children, row)
                    .with_context(|| format!("Row {at}: failed to read 'children'"))?,
                smoker,
                extract_str(region, row)
                    .with_context(|| format!("Row {at}: failed to read 'region'"))?,
                extract_f64(charges, row)
                    .with_context(|| format!("Row {at}: failed to read 'charges'"))?,
            ));
        }
        offset += batch.num_rows();
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| SchemaError::MissingColumns(vec![name.to_string()]))?;
    Ok(batch.column(idx))
}

fn extract_f64(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f64::from(arr.value(row)))
    } else {
        Ok(extract_i64(col, row)? as f64)
    }
}

fn extract_i64(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(i64::from(arr.value(row)))
    } else {
        bail!("expected a numeric column, got {:?}", col.data_type())
    }
}

fn extract_u32(col: &ArrayRef, row: usize) -> Result<u32> {
    let v = extract_i64(col, row)?;
    u32::try_from(v).with_context(|| format!("{v} is out of range"))
}

fn extract_str(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let s = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(s.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a text column, got {other:?}"),
    }
}

/// `Some` only for Boolean columns.
fn extract_bool(col: &ArrayRef, row: usize) -> Option<bool> {
    col.as_any()
        .downcast_ref::<BooleanArray>()
        .filter(|_| !col.is_null(row))
        .map(|arr| arr.value(row))
}
