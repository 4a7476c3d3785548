//! JSON wire codec for entities.
//!
//! Serialization is driven by the field variant. Deserialization infers the
//! variant from the JSON shape alone:
//!
//! | JSON value                    | Field variant               |
//! |-------------------------------|-----------------------------|
//! | object with a `data` array    | `MultiReference`            |
//! | any other object              | `Reference`                 |
//! | `null`                        | `Reference` (unset)         |
//! | RFC 3339 / ISO-8601 string    | `Timestamp`                 |
//! | any other string              | `String`                    |
//! | boolean                       | `Boolean`                   |
//! | integral number within `i64`  | `Integer`                   |
//!
//! Integers are 64-bit signed on both sides of the wire. A number outside
//! that range, or one with a fractional part, is a malformed payload.
//!
//! A string field whose content happens to be a valid timestamp is read back
//! as a `Timestamp`. Nothing at the JSON layer tells the two apart.

use crate::{
    EntityModel, ErrorModel, FieldModel, FieldValue, Model, ModelError, ModelResult,
    MultiReference,
};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Value};

/// Field path reported when the payload as a whole is malformed.
pub const ROOT_FIELD: &str = "$";

const DATA_KEY: &str = "data";
const TOTAL_COUNT_KEY: &str = "total_count";
const EXCEEDS_TOTAL_COUNT_KEY: &str = "exceeds_total_count";
const SNIPPET_MAX_CHARS: usize = 64;

/// A page of entities as returned by collection endpoints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityCollection {
    pub entities: Vec<EntityModel>,
    pub total_count: u64,
    pub exceeds_total_count: bool,
}

/// Converts models to and from the service's JSON representation.
pub struct ModelParser;

impl ModelParser {
    /// Serializes any model to a JSON object, one key per field.
    pub fn to_json<M: Model>(model: &M) -> Value {
        Value::Object(entity_to_map(model.entity()))
    }

    /// Serializes a model to its compact JSON text.
    pub fn to_json_string<M: Model>(model: &M) -> String {
        Self::to_json(model).to_string()
    }

    /// Serializes entities as a request collection: `{"data": [...]}`.
    pub fn collection_to_json(entities: &[EntityModel]) -> Value {
        let data = entities
            .iter()
            .map(|e| Value::Object(entity_to_map(e)))
            .collect();
        let mut map = Map::new();
        map.insert(DATA_KEY.to_string(), Value::Array(data));
        Value::Object(map)
    }

    /// Deserializes one entity from a JSON object.
    ///
    /// Stops at the first field that cannot be mapped to a variant.
    pub fn from_json(value: &Value) -> ModelResult<EntityModel> {
        match value {
            Value::Object(map) => entity_from_map(map, None),
            other => Err(malformed(ROOT_FIELD, other)),
        }
    }

    /// Parses JSON text into one entity.
    pub fn entity_from_str(text: &str) -> ModelResult<EntityModel> {
        let value: Value = serde_json::from_str(text).map_err(|_| malformed_text(text))?;
        Self::from_json(&value)
    }

    /// Deserializes a collection response:
    /// `{"data": [...], "total_count": n, "exceeds_total_count": b}`.
    pub fn collection_from_json(value: &Value) -> ModelResult<EntityCollection> {
        let map = value.as_object().ok_or_else(|| malformed(ROOT_FIELD, value))?;
        let multi = multi_reference_from_map(map, ROOT_FIELD)?;
        let total_count = multi.total_count();
        let exceeds_total_count = multi.exceeds_total_count();
        Ok(EntityCollection {
            entities: multi.into_items(),
            total_count,
            exceeds_total_count,
        })
    }

    pub fn collection_from_str(text: &str) -> ModelResult<EntityCollection> {
        let value: Value = serde_json::from_str(text).map_err(|_| malformed_text(text))?;
        Self::collection_from_json(&value)
    }

    /// Turns an error response body into an [`ErrorModel`].
    ///
    /// Bodies that are not entity JSON are kept verbatim as the description,
    /// so callers always get something to report.
    pub fn error_from_body(body: &str) -> ErrorModel {
        match Self::entity_from_str(body) {
            Ok(entity) if !entity.is_empty() => ErrorModel::new(entity),
            _ => ErrorModel::from_description(body),
        }
    }

    /// Formats a timestamp with its own offset preserved (`Z` for UTC).
    pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Parses an ISO-8601 timestamp carrying an explicit offset.
    pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(text).ok()
    }
}

fn entity_to_map(entity: &EntityModel) -> Map<String, Value> {
    entity
        .iter()
        .map(|field| (field.name().to_string(), value_to_json(field.value())))
        .collect()
}

fn value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Boolean(v) => Value::Bool(*v),
        FieldValue::String(v) => Value::String(v.clone()),
        FieldValue::Integer(v) => Value::from(*v),
        FieldValue::Timestamp(v) => Value::String(ModelParser::format_timestamp(v)),
        FieldValue::Reference(Some(entity)) => Value::Object(entity_to_map(entity)),
        FieldValue::Reference(None) => Value::Null,
        FieldValue::MultiReference(multi) => {
            let data = multi
                .items()
                .iter()
                .map(|e| Value::Object(entity_to_map(e)))
                .collect();
            let mut map = Map::new();
            map.insert(DATA_KEY.to_string(), Value::Array(data));
            map.insert(TOTAL_COUNT_KEY.to_string(), Value::from(multi.total_count()));
            map.insert(
                EXCEEDS_TOTAL_COUNT_KEY.to_string(),
                Value::Bool(multi.exceeds_total_count()),
            );
            Value::Object(map)
        }
    }
}

fn entity_from_map(map: &Map<String, Value>, parent: Option<&str>) -> ModelResult<EntityModel> {
    let mut entity = EntityModel::new();
    for (key, value) in map {
        let path = match parent {
            Some(parent) => format!("{parent}.{key}"),
            None => key.clone(),
        };
        let field_value = value_from_json(value, &path)?;
        let field =
            FieldModel::new(key.as_str(), field_value).map_err(|_| malformed(&path, value))?;
        entity.set_value(field);
    }
    Ok(entity)
}

fn value_from_json(value: &Value, path: &str) -> ModelResult<FieldValue> {
    match value {
        Value::Bool(v) => Ok(FieldValue::Boolean(*v)),
        Value::Number(n) => n
            .as_i64()
            .map(FieldValue::Integer)
            .ok_or_else(|| malformed(path, value)),
        Value::String(s) => Ok(match ModelParser::parse_timestamp(s) {
            Some(ts) => FieldValue::Timestamp(ts),
            None => FieldValue::String(s.clone()),
        }),
        Value::Null => Ok(FieldValue::Reference(None)),
        Value::Object(map) if matches!(map.get(DATA_KEY), Some(Value::Array(_))) => {
            multi_reference_from_map(map, path).map(FieldValue::MultiReference)
        }
        Value::Object(map) => {
            entity_from_map(map, Some(path)).map(|e| FieldValue::Reference(Some(e)))
        }
        Value::Array(_) => Err(malformed(path, value)),
    }
}

fn multi_reference_from_map(map: &Map<String, Value>, path: &str) -> ModelResult<MultiReference> {
    let data_path = format!("{path}.{DATA_KEY}");
    let items = match map.get(DATA_KEY) {
        Some(Value::Array(items)) => items,
        Some(other) => return Err(malformed(&data_path, other)),
        None => return Err(malformed(path, &Value::Object(map.clone()))),
    };

    let entities = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let item_path = format!("{data_path}[{index}]");
            match item {
                Value::Object(obj) => entity_from_map(obj, Some(&item_path)),
                other => Err(malformed(&item_path, other)),
            }
        })
        .collect::<ModelResult<Vec<_>>>()?;

    let total_count = match map.get(TOTAL_COUNT_KEY) {
        None | Some(Value::Null) => entities.len() as u64,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| malformed(&format!("{path}.{TOTAL_COUNT_KEY}"), v))?,
    };
    let exceeds_total_count = match map.get(EXCEEDS_TOTAL_COUNT_KEY) {
        None | Some(Value::Null) => false,
        Some(v) => v
            .as_bool()
            .ok_or_else(|| malformed(&format!("{path}.{EXCEEDS_TOTAL_COUNT_KEY}"), v))?,
    };

    Ok(MultiReference::with_counts(entities, total_count, exceeds_total_count))
}

fn malformed(path: &str, value: &Value) -> ModelError {
    ModelError::MalformedEntityPayload {
        field: path.to_string(),
        snippet: snippet_of(&value.to_string()),
    }
}

fn malformed_text(text: &str) -> ModelError {
    ModelError::MalformedEntityPayload {
        field: ROOT_FIELD.to_string(),
        snippet: snippet_of(text),
    }
}

fn snippet_of(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        return text.to_string();
    }
    let mut snippet: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
    snippet.push('…');
    snippet
}
