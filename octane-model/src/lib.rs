//! Entity model for the Octane REST SDK.
//!
//! Defines the value types every other crate in the workspace exchanges:
//! - [`FieldModel`]: one named, typed value (boolean, string, integer,
//!   timestamp, reference, multi-reference)
//! - [`EntityModel`]: a record of uniquely named fields
//! - [`ErrorModel`]: an entity carrying a server-reported error payload
//! - [`ModelParser`]: the JSON wire codec for all of the above
//! - [`EntityMetadata`] / [`FieldMetadata`]: descriptors served by the
//!   metadata endpoints
//!
//! Models are plain values: once built they can be cloned and shared across
//! threads freely.

mod entity;
mod field;
pub mod metadata;
mod parser;

pub use entity::{EntityModel, ErrorModel, Model};
pub use field::{FieldKind, FieldModel, FieldValue, MultiReference};
pub use metadata::{EntityMetadata, Feature, FeatureKind, FieldMetadata};
pub use parser::{EntityCollection, ModelParser, ROOT_FIELD};

/// Result type alias using the crate's error type.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors raised while building or (de)serializing models.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid field name: field names must not be empty")]
    EmptyFieldName,

    #[error("timestamp `{field}` has offset {offset_secs}s, which is not a whole number of minutes")]
    UnrepresentableOffset { field: String, offset_secs: i32 },

    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("malformed entity payload at `{field}`: {snippet}")]
    MalformedEntityPayload { field: String, snippet: String },

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    /// Returns the offending field path for payload errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ModelError::MalformedEntityPayload { field, .. } => Some(field),
            ModelError::FieldNotFound(name) => Some(name),
            ModelError::UnrepresentableOffset { field, .. } => Some(field),
            _ => None,
        }
    }
}
