// # Remote Wire Shapes
//
// Provider APIs return the same logical collection either as a JSON array or
// as a JSON object with arbitrary keys:
//
// ```json
// { "row": [ { "ID": "1", "name": "www", ... } ] }
// { "row": { "0": { "ID": "1", "name": "www", ... } } }
// ```
//
// Everything in this module exists so that the shape question is answered
// once, at the provider boundary. The differ and synchronizer only ever see
// `Vec<RemoteRecord>`.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record row exactly as the provider reports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Opaque row identifier used to target updates and deletes
    #[serde(rename = "ID", alias = "id", alias = "row_id", default, deserialize_with = "lenient_string")]
    pub row_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ttl: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rdtype: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rdata: String,
}

/// A DNS domain as listed by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDomain {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
}

/// Extract a collection field from a provider `data` payload.
///
/// A missing or `null` field is an empty collection. A map-shaped field is
/// read in wire order with its keys dropped. A field that is neither an array
/// nor an object is logged and treated as empty. Items that do not
/// deserialize are skipped individually.
pub fn collection_from_value<T: DeserializeOwned>(data: &Value, field: &str) -> Vec<T> {
    let items: Vec<&Value> = match data.get(field) {
        None | Some(Value::Null) => {
            tracing::debug!("Payload has no '{}' collection, treating as empty", field);
            return Vec::new();
        }
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(items)) => items.values().collect(),
        Some(other) => {
            tracing::warn!(
                "Unexpected shape for '{}' collection ({}), treating as empty",
                field,
                json_kind(other)
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping malformed '{}' item: {}", field, e);
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accept strings, numbers, booleans and null as a string field
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a scalar, got {}",
            json_kind(&other)
        ))),
    }
}
