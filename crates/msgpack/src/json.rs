//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! Binary payloads are carried through JSON as data URI strings:
//! - `Value::Bin` → `"data:application/octet-stream;base64,<base64>"`
//! - `Value::Ext` → `"data:application/msgpack;base64;ext=<tag>,<base64>"`

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value as JsonValue;

use crate::value::Value;

pub const BIN_URI_START: &str = "data:application/octet-stream;base64,";
pub const MSGPACK_EXT_START: &str = "data:application/msgpack;base64;ext=";

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Nil,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            JsonValue::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Nil | Value::Custom(_) => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Integer(n) => match n.as_u64() {
                Some(u) => JsonValue::from(u),
                None => n.as_i64().map_or(JsonValue::Null, JsonValue::from),
            },
            Value::Float32(f) => float(f64::from(f)),
            Value::Float64(f) => float(f),
            Value::BigInt(n) => JsonValue::String(n.to_string()),
            Value::Str(s) => JsonValue::String(s),
            Value::Bin(b) => JsonValue::String(format!("{BIN_URI_START}{}", STANDARD.encode(b))),
            Value::Ext(ext) => JsonValue::String(format!(
                "{MSGPACK_EXT_START}{},{}",
                ext.tag,
                STANDARD.encode(&ext.payload)
            )),
            Value::Array(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Map(pairs) => JsonValue::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (object_key(k), JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

fn float(f: f64) -> JsonValue {
    serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

/// JSON object keys must be strings; other keys use their JSON text.
fn object_key(key: Value) -> String {
    match key {
        Value::Str(s) => s,
        other => JsonValue::from(other).to_string(),
    }
}
