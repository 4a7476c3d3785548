use crate::{FieldModel, FieldValue, ModelError, ModelResult};
use std::collections::BTreeMap;
use std::fmt;

/// Anything that travels on the wire as an entity JSON object.
///
/// The type tag is metadata about the model and is never emitted as a field.
pub trait Model {
    const TYPE: &'static str;

    fn entity(&self) -> &EntityModel;

    fn model_type(&self) -> &'static str {
        Self::TYPE
    }
}

/// One record of the remote service.
///
/// Fields are keyed by name. Setting a field whose name is already present
/// replaces the old value. Iteration is ordered by field name so serialized
/// output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityModel {
    fields: BTreeMap<String, FieldModel>,
}

impl EntityModel {
    /// Creates an entity with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity from an initial set of fields; later duplicates win.
    pub fn with_fields(fields: impl IntoIterator<Item = FieldModel>) -> Self {
        fields.into_iter().collect()
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldModel> {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.values()
    }

    /// Inserts the field, replacing any field with the same name.
    pub fn set_value(&mut self, field: FieldModel) {
        self.fields.insert(field.name().to_string(), field);
    }

    /// Returns the named field, or [`ModelError::FieldNotFound`] when the
    /// entity has no such field.
    pub fn get_value(&self, name: &str) -> ModelResult<&FieldModel> {
        self.fields
            .get(name)
            .ok_or_else(|| ModelError::FieldNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&FieldModel> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `id` field as text. The service sends ids as strings but older
    /// endpoints use integers, so both are accepted.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")?.value() {
            FieldValue::String(id) => Some(id.clone()),
            FieldValue::Integer(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.fields.get("type").and_then(FieldModel::as_str)
    }
}

impl Model for EntityModel {
    const TYPE: &'static str = "entity_model";

    fn entity(&self) -> &EntityModel {
        self
    }
}

impl FromIterator<FieldModel> for EntityModel {
    fn from_iter<I: IntoIterator<Item = FieldModel>>(iter: I) -> Self {
        let mut entity = EntityModel::new();
        for field in iter {
            entity.set_value(field);
        }
        entity
    }
}

impl Extend<FieldModel> for EntityModel {
    fn extend<I: IntoIterator<Item = FieldModel>>(&mut self, iter: I) {
        for field in iter {
            self.set_value(field);
        }
    }
}

/// A server-reported error payload.
///
/// Shares all of [`EntityModel`]'s invariants; only the type tag differs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorModel {
    entity: EntityModel,
}

impl ErrorModel {
    pub fn new(entity: EntityModel) -> Self {
        Self { entity }
    }

    /// Builds an error from a plain message, stored as `description`.
    pub fn from_description(message: impl Into<String>) -> Self {
        let mut entity = EntityModel::new();
        if let Ok(field) = FieldModel::string("description", message) {
            entity.set_value(field);
        }
        Self { entity }
    }

    pub fn set_value(&mut self, field: FieldModel) {
        self.entity.set_value(field);
    }

    pub fn get_value(&self, name: &str) -> ModelResult<&FieldModel> {
        self.entity.get_value(name)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.entity.get("error_code").and_then(FieldModel::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.entity
            .get("description_translated")
            .or_else(|| self.entity.get("description"))
            .and_then(FieldModel::as_str)
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.entity.get("correlation_id").and_then(FieldModel::as_str)
    }

    pub fn into_entity(self) -> EntityModel {
        self.entity
    }
}

impl Model for ErrorModel {
    const TYPE: &'static str = "error_model";

    fn entity(&self) -> &EntityModel {
        &self.entity
    }
}

impl From<EntityModel> for ErrorModel {
    fn from(entity: EntityModel) -> Self {
        Self::new(entity)
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.error_code(), self.description()) {
            (Some(code), Some(description)) => write!(f, "{code}: {description}"),
            (None, Some(description)) => f.write_str(description),
            (Some(code), None) => f.write_str(code),
            (None, None) => f.write_str("unknown server error"),
        }
    }
}
