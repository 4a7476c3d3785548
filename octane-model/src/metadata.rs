//! Entity and field descriptors served by the metadata endpoints.
//!
//! Features are looked up by [`FeatureKind`] tag rather than by type, so the
//! set of features an entity supports is plain data.

use crate::{FieldKind, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Tag identifying one entity feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    Auditing,
    BusinessRules,
    Comments,
    Hierarchy,
    Mailing,
    Ordering,
    Phases,
    Rest,
    SubTypes,
    SubTypesOf,
    Udf,
    Attachments,
    Other(String),
}

impl FeatureKind {
    /// Maps the wire name of a feature to its tag.
    pub fn from_name(name: &str) -> Self {
        match name {
            "auditing" => FeatureKind::Auditing,
            "business_rules" => FeatureKind::BusinessRules,
            "comments" => FeatureKind::Comments,
            "hierarchy" => FeatureKind::Hierarchy,
            "mailing" => FeatureKind::Mailing,
            "ordering" => FeatureKind::Ordering,
            "phases" => FeatureKind::Phases,
            "rest" => FeatureKind::Rest,
            "subtypes" => FeatureKind::SubTypes,
            "subtype_of" => FeatureKind::SubTypesOf,
            "user_defined_fields" => FeatureKind::Udf,
            "attachments" => FeatureKind::Attachments,
            other => FeatureKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FeatureKind::Auditing => "auditing",
            FeatureKind::BusinessRules => "business_rules",
            FeatureKind::Comments => "comments",
            FeatureKind::Hierarchy => "hierarchy",
            FeatureKind::Mailing => "mailing",
            FeatureKind::Ordering => "ordering",
            FeatureKind::Phases => "phases",
            FeatureKind::Rest => "rest",
            FeatureKind::SubTypes => "subtypes",
            FeatureKind::SubTypesOf => "subtype_of",
            FeatureKind::Udf => "user_defined_fields",
            FeatureKind::Attachments => "attachments",
            FeatureKind::Other(name) => name,
        }
    }
}

/// A feature together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Auditing,
    BusinessRules,
    Comments,
    Hierarchy {
        child_types: Vec<String>,
        parent_types: Vec<String>,
    },
    Mailing,
    Ordering,
    Phases,
    Rest {
        url: String,
        methods: Vec<String>,
    },
    SubTypes {
        types: Vec<String>,
    },
    SubTypesOf {
        type_name: String,
    },
    Udf,
    Attachments,
    Other {
        name: String,
        raw: Map<String, Value>,
    },
}

impl Feature {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Auditing => FeatureKind::Auditing,
            Feature::BusinessRules => FeatureKind::BusinessRules,
            Feature::Comments => FeatureKind::Comments,
            Feature::Hierarchy { .. } => FeatureKind::Hierarchy,
            Feature::Mailing => FeatureKind::Mailing,
            Feature::Ordering => FeatureKind::Ordering,
            Feature::Phases => FeatureKind::Phases,
            Feature::Rest { .. } => FeatureKind::Rest,
            Feature::SubTypes { .. } => FeatureKind::SubTypes,
            Feature::SubTypesOf { .. } => FeatureKind::SubTypesOf,
            Feature::Udf => FeatureKind::Udf,
            Feature::Attachments => FeatureKind::Attachments,
            Feature::Other { name, .. } => FeatureKind::Other(name.clone()),
        }
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ModelError::InvalidMetadata(format!("feature is not an object: {value}")))?;
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::InvalidMetadata("feature without a name".to_string()))?;

        Ok(match FeatureKind::from_name(name) {
            FeatureKind::Auditing => Feature::Auditing,
            FeatureKind::BusinessRules => Feature::BusinessRules,
            FeatureKind::Comments => Feature::Comments,
            FeatureKind::Hierarchy => Feature::Hierarchy {
                child_types: string_list(map, "child_types"),
                parent_types: string_list(map, "parent_types"),
            },
            FeatureKind::Mailing => Feature::Mailing,
            FeatureKind::Ordering => Feature::Ordering,
            FeatureKind::Phases => Feature::Phases,
            FeatureKind::Rest => Feature::Rest {
                url: map
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                methods: string_list(map, "methods"),
            },
            FeatureKind::SubTypes => Feature::SubTypes {
                types: string_list(map, "types"),
            },
            FeatureKind::SubTypesOf => Feature::SubTypesOf {
                type_name: map
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            FeatureKind::Udf => Feature::Udf,
            FeatureKind::Attachments => Feature::Attachments,
            FeatureKind::Other(name) => {
                let mut raw = map.clone();
                raw.remove("name");
                Feature::Other { name, raw }
            }
        })
    }
}

fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Descriptor of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    name: String,
    label: String,
    can_modify_label: bool,
    features: BTreeMap<FeatureKind, Feature>,
}

impl EntityMetadata {
    pub const TYPE: &'static str = "entity_metadata";

    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        can_modify_label: bool,
        features: impl IntoIterator<Item = Feature>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            can_modify_label,
            features: features.into_iter().map(|f| (f.kind(), f)).collect(),
        }
    }

    /// Parses one element of the `/metadata/entities` response.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ModelError::InvalidMetadata(format!("not an object: {value}")))?;
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::InvalidMetadata("entity metadata without a name".to_string()))?;
        let label = map.get("label").and_then(Value::as_str).unwrap_or(name);
        let can_modify_label = map
            .get("can_modify_label")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let features = match map.get("features") {
            Some(Value::Array(items)) => items
                .iter()
                .map(Feature::from_json)
                .collect::<ModelResult<Vec<_>>>()?,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(ModelError::InvalidMetadata(format!(
                    "features is not an array: {other}"
                )));
            }
        };

        Ok(Self::new(name, label, can_modify_label, features))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn can_modify_label(&self) -> bool {
        self.can_modify_label
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Returns the feature with the given tag, if the entity has it.
    pub fn feature(&self, kind: &FeatureKind) -> Option<&Feature> {
        self.features.get(kind)
    }

    pub fn has_feature(&self, kind: &FeatureKind) -> bool {
        self.features.contains_key(kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeData {
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub targets: Vec<FieldTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTarget {
    #[serde(rename = "type")]
    pub target_type: String,
}

/// Descriptor of one field of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub entity_name: Option<String>,
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type_data: Option<FieldTypeData>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
}

impl FieldMetadata {
    pub const TYPE: &'static str = "field_metadata";

    pub fn from_json(value: &Value) -> ModelResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// The field variant values of this field decode to, when the type maps
    /// onto one. Useful to tell real timestamps from look-alike strings.
    pub fn field_kind(&self) -> Option<FieldKind> {
        match self.field_type.as_str() {
            "boolean" => Some(FieldKind::Boolean),
            "string" | "memo" => Some(FieldKind::String),
            "integer" | "long" => Some(FieldKind::Integer),
            "date_time" | "date" => Some(FieldKind::Timestamp),
            "reference" => {
                let multiple = self
                    .field_type_data
                    .as_ref()
                    .is_some_and(|data| data.multiple);
                Some(if multiple {
                    FieldKind::MultiReference
                } else {
                    FieldKind::Reference
                })
            }
            _ => None,
        }
    }
}
