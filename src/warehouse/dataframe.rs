//! Result set ↔ DataFrame conversion
//!
//! The SQL API returns rows as JSON objects. Columns are typed from the
//! first non-null value seen; a column that mixes integers and floats is
//! widened to floats.

use polars::prelude::*;
use serde_json::Value;

use super::error::ClientError;

/// Build a DataFrame from JSON row objects.
///
/// Column order follows the key order of the first row. Rows missing a key
/// contribute a null.
pub fn dataframe_from_rows(rows: &[Value]) -> Result<DataFrame, ClientError> {
    let Some(first) = rows.first() else {
        return Ok(DataFrame::empty());
    };

    let columns = match first {
        Value::Object(map) => map.keys().cloned().collect::<Vec<_>>(),
        other => {
            return Err(ClientError::Malformed {
                detail: format!("expected row objects, got {}", other),
            })
        }
    };

    let series = columns
        .iter()
        .map(|name| column_series(name, rows))
        .collect::<Result<Vec<_>, _>>()?;

    DataFrame::new(series).map_err(ClientError::from)
}

/// Serialize a DataFrame to JSON row objects, one per row.
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<Value>, ClientError> {
    let names = df.get_column_names();
    let mut rows = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let mut row = serde_json::Map::new();
        for name in &names {
            let value = df.column(name)?.get(i)?;
            row.insert(name.to_string(), any_value_to_json(&value));
        }
        rows.push(Value::Object(row));
    }

    Ok(rows)
}

fn any_value_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => Value::from(*v),
        AnyValue::Float64(v) => Value::from(*v),
        AnyValue::String(s) => Value::from(*s),
        AnyValue::StringOwned(s) => Value::from(s.as_str()),
        other => Value::from(format!("{}", other)),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Str,
}

fn column_series(name: &str, rows: &[Value]) -> Result<Series, ClientError> {
    let mut kind = None;
    for row in rows {
        match row.get(name) {
            Some(Value::Null) | None => {}
            Some(Value::Bool(_)) => {
                kind = Some(ColumnKind::Bool);
                break;
            }
            Some(Value::Number(n)) => {
                if n.is_i64() {
                    // Keep scanning: a later float widens the column
                    kind = Some(match kind {
                        Some(ColumnKind::Float) => ColumnKind::Float,
                        _ => ColumnKind::Int,
                    });
                } else {
                    kind = Some(ColumnKind::Float);
                    break;
                }
            }
            Some(_) => {
                kind = Some(ColumnKind::Str);
                break;
            }
        }
    }

    match kind {
        Some(ColumnKind::Int) => {
            let values: Vec<Option<i64>> = rows
                .iter()
                .map(|r| r.get(name).and_then(Value::as_i64))
                .collect();
            Ok(Series::new(name, values))
        }
        Some(ColumnKind::Float) => {
            let values: Vec<Option<f64>> = rows
                .iter()
                .map(|r| r.get(name).and_then(Value::as_f64))
                .collect();
            Ok(Series::new(name, values))
        }
        Some(ColumnKind::Bool) => {
            let values: Vec<Option<bool>> = rows
                .iter()
                .map(|r| r.get(name).and_then(Value::as_bool))
                .collect();
            Ok(Series::new(name, values))
        }
        Some(ColumnKind::Str) => {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|r| {
                    r.get(name).and_then(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                })
                .collect();
            Ok(Series::new(name, values))
        }
        // All-null column: type it as string
        None => {
            let values: Vec<Option<String>> = vec![None; rows.len()];
            Ok(Series::new(name, values))
        }
    }
}
