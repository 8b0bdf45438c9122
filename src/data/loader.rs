use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ColumnMapping, Feature, FeatureTable};
use crate::error::{EvalError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a feature table from a file.  Dispatch by extension.
///
/// Only the three columns named by `columns` are kept; they become
/// `id`, `mz` and `rt`.  Row order and row count are preserved.
///
/// Supported formats:
/// * `.csv`          – comma separated, header row
/// * `.tsv` / `.txt` – tab separated, header row
/// * `.json`         – `[{ "row ID": 1, "row m/z": 100.0, ... }, ...]`
/// * `.parquet`      – any integer, float or string column types
pub fn load_file(path: &Path, columns: &ColumnMapping) -> Result<FeatureTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b',', columns)?,
        "tsv" | "txt" => load_delimited(path, b'\t', columns)?,
        "json" => load_json(path, columns)?,
        "parquet" | "pq" => load_parquet(path, columns)?,
        other => return Err(EvalError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} features from {}", table.len(), path.display());
    Ok(table)
}

fn invalid_value(path: &Path, row: usize, column: &str, value: impl ToString) -> EvalError {
    EvalError::InvalidValue {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_finite(path: &Path, row: usize, column: &str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid_value(path, row, column, raw)),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one feature per record.
/// MZmine writes a trailing delimiter on every line; the resulting unnamed
/// column is dropped together with every other column we do not need.
fn load_delimited(path: &Path, delimiter: u8, columns: &ColumnMapping) -> Result<FeatureTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let missing = columns.missing(headers.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(EvalError::Schema {
            path: path.to_path_buf(),
            missing,
        });
    }

    let position = |name: &str| headers.iter().position(|h| h == name).unwrap_or(0);
    let id_idx = position(&columns.id);
    let mz_idx = position(&columns.mz);
    let rt_idx = position(&columns.rt);

    let mut features = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let id = record.get(id_idx).unwrap_or("").trim();
        let mz = parse_finite(path, row_no, &columns.mz, record.get(mz_idx).unwrap_or(""))?;
        let rt = parse_finite(path, row_no, &columns.rt, record.get(rt_idx).unwrap_or(""))?;
        features.push(Feature::new(id, mz, rt));
    }

    Ok(FeatureTable::new(features))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "row ID": 1, "row m/z": 100.0, "row retention time": 5.0, "area": 1e6 },
///   ...
/// ]
/// ```
///
/// Numbers given as strings are accepted for `mz` and `rt`.
fn load_json(path: &Path, columns: &ColumnMapping) -> Result<FeatureTable> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| invalid_value(path, 0, "<root>", "expected a top-level JSON array"))?;

    let mut features = Vec::with_capacity(records.len());
    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| invalid_value(path, row_no, "<record>", rec))?;

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let missing = columns.missing(keys.iter().copied());
        if !missing.is_empty() {
            return Err(EvalError::Schema {
                path: path.to_path_buf(),
                missing,
            });
        }

        let id = match &obj[&columns.id] {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        let mz = json_to_f64(path, row_no, &columns.mz, &obj[&columns.mz])?;
        let rt = json_to_f64(path, row_no, &columns.rt, &obj[&columns.rt])?;
        features.push(Feature::new(id, mz, rt));
    }

    Ok(FeatureTable::new(features))
}

fn json_to_f64(path: &Path, row: usize, column: &str, val: &JsonValue) -> Result<f64> {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid_value(path, row, column, n)),
        JsonValue::String(s) => parse_finite(path, row, column, s),
        other => Err(invalid_value(path, row, column, other)),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a feature table.
///
/// The id column may be of any type castable to a string, the mass and
/// retention-time columns of any numeric type (or numeric strings).
fn load_parquet(path: &Path, columns: &ColumnMapping) -> Result<FeatureTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let missing = columns.missing(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    );
    if !missing.is_empty() {
        return Err(EvalError::Schema {
            path: path.to_path_buf(),
            missing,
        });
    }

    let reader = builder.build()?;
    let mut features = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let id_col = cast(batch.column(schema.index_of(&columns.id)?), &DataType::Utf8)?;
        let mz_col = cast(batch.column(schema.index_of(&columns.mz)?), &DataType::Float64)?;
        let rt_col = cast(batch.column(schema.index_of(&columns.rt)?), &DataType::Float64)?;

        let ids = id_col.as_string::<i32>();
        let mzs = mz_col.as_primitive::<Float64Type>();
        let rts = rt_col.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            let id = if ids.is_null(row) { "" } else { ids.value(row) };
            let mz = parquet_f64(path, row_no, &columns.mz, mzs, row)?;
            let rt = parquet_f64(path, row_no, &columns.rt, rts, row)?;
            features.push(Feature::new(id, mz, rt));
        }
        offset += batch.num_rows();
    }

    Ok(FeatureTable::new(features))
}

fn parquet_f64(
    path: &Path,
    row_no: usize,
    column: &str,
    values: &arrow::array::Float64Array,
    row: usize,
) -> Result<f64> {
    if values.is_null(row) {
        return Err(invalid_value(path, row_no, column, "null"));
    }
    let v = values.value(row);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid_value(path, row_no, column, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_keeps_required_columns_and_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "quant.csv",
            "row ID,row m/z,row retention time,sample.mzML Peak area,\n\
             7,300.5,2.25,1000,\n\
             3,100.0,5.0,2000,\n",
        );
        let table = load_file(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(
            table.features(),
            &[Feature::new("7", 300.5, 2.25), Feature::new("3", 100.0, 5.0)]
        );
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "quant.tsv",
            "row ID\trow m/z\trow retention time\n1\t150.25\t3.5\n",
        );
        let table = load_file(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(table.features(), &[Feature::new("1", 150.25, 3.5)]);
    }

    #[test]
    fn missing_columns_raise_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "row ID,mz,rt\n1,100.0,5.0\n");
        match load_file(&path, &ColumnMapping::default()) {
            Err(EvalError::Schema { missing, .. }) => {
                assert_eq!(missing, vec!["row m/z", "row retention time"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn custom_column_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "alt.csv", "id,mz,rt\nA,100.0,5.0\n");
        let columns = ColumnMapping {
            id: "id".into(),
            mz: "mz".into(),
            rt: "rt".into(),
        };
        let table = load_file(&path, &columns).unwrap();
        assert_eq!(table.features(), &[Feature::new("A", 100.0, 5.0)]);
    }

    #[test]
    fn non_numeric_mass_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "nan.csv",
            "row ID,row m/z,row retention time\n1,abc,5.0\n",
        );
        assert!(matches!(
            load_file(&path, &ColumnMapping::default()),
            Err(EvalError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", "row ID,row m/z,row retention time\n");
        let table = load_file(&path, &ColumnMapping::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "quant.json",
            r#"[{"row ID": 1, "row m/z": 100.0, "row retention time": "5.0", "area": 3},
                {"row ID": "x2", "row m/z": 200.5, "row retention time": 6.5}]"#,
        );
        let table = load_file(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(
            table.features(),
            &[Feature::new("1", 100.0, 5.0), Feature::new("x2", 200.5, 6.5)]
        );
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "quant.xlsx", "");
        assert!(matches!(
            load_file(&path, &ColumnMapping::default()),
            Err(EvalError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
