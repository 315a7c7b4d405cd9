//! Conversions between key-value objects, records and maps
//!
//! A [`Record`] is the ordered, serializable form used for persisted
//! metadata such as response headers; a `HashMap` is the working form.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Ordered string-to-string record
pub type Record = BTreeMap<String, String>;

/// Flatten a serializable key-value object into a record of `V`
///
/// Each top-level field becomes one entry. Fails with `Error::NotAnObject`
/// unless `obj` serializes to an object, and with `Error::Json` if a field
/// does not convert to `V`.
pub fn object_to_record<S, V>(obj: &S) -> Result<BTreeMap<String, V>>
where
    S: Serialize + ?Sized,
    V: DeserializeOwned,
{
    match serde_json::to_value(obj)? {
        Value::Object(fields) => fields
            .into_iter()
            .map(|(key, value)| -> Result<(String, V)> {
                Ok((key, serde_json::from_value(value)?))
            })
            .collect(),
        other => Err(Error::not_an_object(json_kind(&other))),
    }
}

/// Convert a map into a record
pub fn map_to_record(map: &HashMap<String, String>) -> Record {
    map.iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Convert a record into a map
pub fn record_to_map(record: &Record) -> HashMap<String, String> {
    record
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Return a copy of `record` with `key` set to `value`, or removed when `value` is `None`
pub fn modify_record(record: &Record, key: &str, value: Option<&str>) -> Record {
    let mut modified = record.clone();
    match value {
        Some(value) => {
            modified.insert(key.to_string(), value.to_string());
        }
        None => {
            modified.remove(key);
        }
    }
    modified
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
