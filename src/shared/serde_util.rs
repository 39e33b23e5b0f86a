//! Serde helpers for ledger reply formats.

use serde_json::Value;

/// Nodes return read `data` either as an object or as a JSON document
/// encoded in a string. Decodes the string form; a string that is not JSON
/// stays a string, `null` becomes `None`.
pub fn decode_embedded_json(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Null) => None,
            Ok(decoded) => Some(decoded),
            Err(_) => Some(Value::String(text)),
        },
        other => Some(other),
    }
}

/// Treats an explicit `null` like a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ledger `txnTime` is Unix seconds.
pub mod timestamp_secs {
    use chrono::{DateTime, Utc};

    pub fn to_datetime(secs: i64) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(secs, 0)
    }
}
