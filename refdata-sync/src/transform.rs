//! Raw table normalization.
//!
//! Parses the header-row CSV, projects each row down to the dataset's
//! declared column subset (in declared order, under declared output names),
//! and serializes the result to the output artifact as a pretty-printed JSON
//! array of objects.
//!
//! A declared column missing from the raw header is a hard
//! [`SyncError::Transform`] — upstream schema drift must surface, never be
//! silently dropped. Row order is preserved.

use std::path::Path;

use serde_json::{Map, Number, Value};

use refdata_core::DatasetSpec;

use crate::error::{transform_err, SyncError};
use crate::writer::atomic_write;

/// One output row: projected fields in declared order.
pub type NormalizedRecord = Map<String, Value>;

/// Project the raw table into normalized records.
pub fn transform(spec: &DatasetSpec, raw: &[u8]) -> Result<Vec<NormalizedRecord>, SyncError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(raw);
    let headers = reader
        .headers()
        .map_err(|e| transform_err(format!("unreadable header row: {e}")))?
        .clone();

    // Resolve every declared source column up front so schema drift fails
    // the whole dataset before any row is emitted.
    let mut indices = Vec::with_capacity(spec.columns.len());
    for column in &spec.columns {
        let index = headers
            .iter()
            .position(|h| h == column.source)
            .ok_or_else(|| {
                transform_err(format!(
                    "required column '{}' missing from raw header",
                    column.source
                ))
            })?;
        indices.push(index);
    }

    let mut records = Vec::new();
    for (row_number, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            transform_err(format!("malformed row {}: {e}", row_number + 2))
        })?;
        let mut record = Map::new();
        for (column, &index) in spec.columns.iter().zip(&indices) {
            let cell = row.get(index).unwrap_or("");
            record.insert(column.output_name().to_owned(), cell_value(cell));
        }
        records.push(record);
    }

    tracing::debug!("transformed {} rows for '{}'", records.len(), spec.name);
    Ok(records)
}

/// Serialize `records` to `<root>/<output_path>` atomically.
///
/// A failed write leaves any prior artifact untouched.
pub fn write_output(
    spec: &DatasetSpec,
    records: &[NormalizedRecord],
    root: &Path,
) -> Result<(), SyncError> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| transform_err(format!("serialization failed: {e}")))?;
    atomic_write(&root.join(&spec.output_path), json.as_bytes())
}

/// Carry a CSV cell into JSON.
///
/// Integers and decimals become JSON numbers, empty cells `null`, everything
/// else a string. Tokens that would not survive a numeric round-trip (FIPS
/// codes with leading zeros, "+5") stay strings.
fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        if n.to_string() == cell {
            return Value::from(n);
        }
        return Value::String(cell.to_owned());
    }
    let leading_numeric = cell
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    if leading_numeric {
        if let Ok(f) = cell.parse::<f64>() {
            if f.is_finite() {
                if let Some(number) = Number::from_f64(f) {
                    return Value::Number(number);
                }
            }
        }
    }
    Value::String(cell.to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use refdata_core::{ColumnSpec, DatasetName, FetchSpec, LocatorSpec};
    use tempfile::TempDir;

    use super::*;

    fn spec_with_columns(columns: &[(&str, Option<&str>)]) -> DatasetSpec {
        DatasetSpec {
            name: DatasetName::from("cities"),
            locator: LocatorSpec::Probe {
                url: "https://upstream.test/unused".into(),
                header: "Last-Modified".into(),
            },
            fetch: FetchSpec::Direct,
            columns: columns
                .iter()
                .map(|(source, rename)| ColumnSpec {
                    source: (*source).to_owned(),
                    rename: rename.map(str::to_owned),
                })
                .collect(),
            raw_path: "raw.csv".into(),
            output_path: "out.json".into(),
            version_path: "version.txt".into(),
        }
    }

    const RAW: &[u8] = b"\
city,state_id,state_name,county_fips,county_name,lat,lng,population,extra_col\n\
New York,NY,New York,36061,New York,40.6943,-73.9249,18908608,junk\n\
Autaugaville,AL,Alabama,01001,Autauga,32.4312,-86.6549,980,junk\n";

    #[test]
    fn projects_declared_subset_in_declared_order() {
        let spec = spec_with_columns(&[
            ("city", None),
            ("state_id", None),
            ("state_name", None),
            ("county_fips", None),
            ("county_name", None),
            ("lat", None),
            ("lng", None),
            ("population", None),
        ]);
        let records = transform(&spec, RAW).unwrap();
        assert_eq!(records.len(), 2);

        let fields: Vec<&String> = records[0].keys().collect();
        assert_eq!(
            fields,
            [
                "city",
                "state_id",
                "state_name",
                "county_fips",
                "county_name",
                "lat",
                "lng",
                "population"
            ]
        );
        assert!(
            !records[0].contains_key("extra_col"),
            "undeclared columns must be dropped"
        );
    }

    #[test]
    fn values_carried_with_type_inference() {
        let spec = spec_with_columns(&[
            ("city", None),
            ("county_fips", None),
            ("lat", None),
            ("population", None),
        ]);
        let records = transform(&spec, RAW).unwrap();

        assert_eq!(records[0]["city"], Value::from("New York"));
        assert_eq!(records[0]["lat"], Value::from(40.6943));
        assert_eq!(records[0]["population"], Value::from(18908608_i64));
        // Leading zero means a numeric round-trip would mangle the code.
        assert_eq!(records[1]["county_fips"], Value::from("01001"));
    }

    #[test]
    fn empty_cell_becomes_null() {
        let spec = spec_with_columns(&[("city", None), ("population", None)]);
        let raw = b"city,population\nNowhere,\n";
        let records = transform(&spec, raw).unwrap();
        assert_eq!(records[0]["population"], Value::Null);
    }

    #[test]
    fn rename_changes_output_field_name() {
        let spec = spec_with_columns(&[("coty_name", Some("county"))]);
        let raw = b"ste_code,coty_name\n01,Autauga\n";
        let records = transform(&spec, raw).unwrap();
        assert_eq!(records[0]["county"], Value::from("Autauga"));
        assert!(!records[0].contains_key("coty_name"));
    }

    #[test]
    fn missing_required_column_is_transform_error() {
        let spec = spec_with_columns(&[("city", None), ("population", None)]);
        let raw = b"city,state_id\nNew York,NY\n";
        let err = transform(&spec, raw).expect_err("should fail");
        match err {
            SyncError::Transform { reason } => assert!(reason.contains("population")),
            other => panic!("expected transform error, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_transform_error() {
        let spec = spec_with_columns(&[("city", None)]);
        let raw = b"city,population\nNew York,100,extra\n";
        let err = transform(&spec, raw).expect_err("should fail");
        assert!(matches!(err, SyncError::Transform { .. }));
    }

    #[test]
    fn output_is_pretty_json_array() {
        let root = TempDir::new().unwrap();
        let spec = spec_with_columns(&[("city", None), ("population", None)]);
        let records = transform(&spec, RAW).unwrap();
        write_output(&spec, &records, root.path()).unwrap();

        let written = std::fs::read_to_string(root.path().join("out.json")).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(written.contains("\n"), "artifact should be indented");
    }

    #[test]
    fn non_numeric_tokens_stay_strings() {
        assert_eq!(cell_value("NY"), Value::from("NY"));
        assert_eq!(cell_value("inf"), Value::from("inf"));
        assert_eq!(cell_value("nan"), Value::from("nan"));
        assert_eq!(cell_value("+5"), Value::from("+5"));
        assert_eq!(cell_value("-86.6549"), Value::from(-86.6549));
    }
}
