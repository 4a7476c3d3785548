use crate::{EntityModel, ModelError, ModelResult};
use chrono::{DateTime, FixedOffset};

/// The closed set of field kinds accepted by the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    Boolean,
    String,
    Integer,
    Timestamp,
    Reference,
    MultiReference,
}

/// A paginated relation: the page of related entities plus the counts the
/// server reported for the whole relation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiReference {
    items: Vec<EntityModel>,
    total_count: u64,
    exceeds_total_count: bool,
}

impl MultiReference {
    /// Creates a fully-loaded relation; `total_count` equals the item count.
    pub fn new(items: Vec<EntityModel>) -> Self {
        let total_count = items.len() as u64;
        Self {
            items,
            total_count,
            exceeds_total_count: false,
        }
    }

    /// Creates one page of a larger relation.
    pub fn with_counts(items: Vec<EntityModel>, total_count: u64, exceeds_total_count: bool) -> Self {
        Self {
            items,
            total_count,
            exceeds_total_count,
        }
    }

    pub fn items(&self) -> &[EntityModel] {
        &self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn exceeds_total_count(&self) -> bool {
        self.exceeds_total_count
    }

    pub fn into_items(self) -> Vec<EntityModel> {
        self.items
    }
}

/// The typed payload of a [`FieldModel`].
///
/// `Reference(None)` is how an unset reference travels on the wire (`null`).
#[derive(Debug, Clone)]
pub enum FieldValue {
    Boolean(bool),
    String(String),
    Integer(i64),
    Timestamp(DateTime<FixedOffset>),
    Reference(Option<EntityModel>),
    MultiReference(MultiReference),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::Reference(_) => FieldKind::Reference,
            FieldValue::MultiReference(_) => FieldKind::MultiReference,
        }
    }
}

// chrono compares instants only; two timestamps are the same value here only
// when the offset matches as well.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => {
                a == b && a.offset() == b.offset()
            }
            (FieldValue::Reference(a), FieldValue::Reference(b)) => a == b,
            (FieldValue::MultiReference(a), FieldValue::MultiReference(b)) => a == b,
            _ => false,
        }
    }
}

/// One named value of an entity.
///
/// The name is the field's identity inside an [`EntityModel`]; the value
/// type is fixed by the variant and never coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    name: String,
    value: FieldValue,
}

impl FieldModel {
    /// Creates a field, rejecting an empty name.
    ///
    /// Timestamps must carry an offset of whole minutes, the finest offset
    /// ISO-8601 text can express.
    pub fn new(name: impl Into<String>, value: FieldValue) -> ModelResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::EmptyFieldName);
        }
        if let FieldValue::Timestamp(ts) = &value {
            let offset_secs = ts.offset().local_minus_utc();
            if offset_secs % 60 != 0 {
                return Err(ModelError::UnrepresentableOffset {
                    field: name,
                    offset_secs,
                });
            }
        }
        Ok(Self { name, value })
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> ModelResult<Self> {
        Self::new(name, FieldValue::Boolean(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> ModelResult<Self> {
        Self::new(name, FieldValue::String(value.into()))
    }

    pub fn integer(name: impl Into<String>, value: i64) -> ModelResult<Self> {
        Self::new(name, FieldValue::Integer(value))
    }

    pub fn timestamp(name: impl Into<String>, value: DateTime<FixedOffset>) -> ModelResult<Self> {
        Self::new(name, FieldValue::Timestamp(value))
    }

    pub fn reference(name: impl Into<String>, value: EntityModel) -> ModelResult<Self> {
        Self::new(name, FieldValue::Reference(Some(value)))
    }

    /// A reference field that is explicitly unset.
    pub fn empty_reference(name: impl Into<String>) -> ModelResult<Self> {
        Self::new(name, FieldValue::Reference(None))
    }

    pub fn multi_reference(name: impl Into<String>, value: MultiReference) -> ModelResult<Self> {
        Self::new(name, FieldValue::MultiReference(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    pub fn into_value(self) -> FieldValue {
        self.value
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            FieldValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            FieldValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match &self.value {
            FieldValue::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    /// The referenced entity, if this is a set reference.
    pub fn as_reference(&self) -> Option<&EntityModel> {
        match &self.value {
            FieldValue::Reference(v) => v.as_ref(),
            _ => None,
        }
    }

    pub fn as_multi_reference(&self) -> Option<&MultiReference> {
        match &self.value {
            FieldValue::MultiReference(v) => Some(v),
            _ => None,
        }
    }
}
