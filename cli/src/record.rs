//! JSON records and rows for the command line.
//!
//! Records are flat JSON objects keyed by field name; rows are printed as
//! JSON objects keyed by column name.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value as Json};
use tablemap_core::{Row, Value};

/// Parses a JSON object into field values.
pub fn parse_record(raw: &str) -> Result<BTreeMap<String, Value>, String> {
    let json: Json = serde_json::from_str(raw).map_err(|e| format!("invalid record JSON: {e}"))?;
    let Json::Object(object) = json else {
        return Err("record must be a JSON object".to_string());
    };

    let mut record = BTreeMap::new();
    for (field, value) in object {
        let value = json_to_value(&field, value)?;
        record.insert(field, value);
    }
    Ok(record)
}

fn json_to_value(field: &str, json: Json) -> Result<Value, String> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Boolean(b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Integer(i)),
            None => n
                .as_f64()
                .map(Value::Real)
                .ok_or_else(|| format!("field '{field}': number {n} out of range")),
        },
        Json::String(s) => Ok(Value::Text(s)),
        Json::Array(_) | Json::Object(_) => {
            Err(format!("field '{field}': nested values are not supported"))
        }
    }
}

/// Renders a row as a JSON object keyed by column name, in row order.
pub fn row_to_json(row: &Row) -> Json {
    let mut object = Map::new();
    for (column, value) in row.columns().iter().zip(row.values()) {
        object.insert(column.clone(), value_to_json(value));
    }
    Json::Object(object)
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(i) => Json::from(*i),
        Value::Real(r) => Number::from_f64(*r).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Timestamp(ts) => Json::String(ts.to_string()),
        Value::Blob(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
    }
}
