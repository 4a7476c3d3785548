//! Entity and field metadata of a workspace.

use crate::client::Octane;
use crate::error::{SdkError, SdkResult};
use octane_model::{EntityMetadata, FieldMetadata};
use octane_query::{CollectionQuery, Query};
use octane_transport::HttpRequest;
use serde_json::Value;

pub struct Metadata<'a> {
    octane: &'a Octane,
    url: String,
}

impl<'a> Metadata<'a> {
    pub(crate) fn new(octane: &'a Octane, url: String) -> Self {
        Self { octane, url }
    }

    /// Metadata of the named entity types, or of all types when `names` is
    /// empty.
    pub async fn entities(&self, names: &[&str]) -> SdkResult<Vec<EntityMetadata>> {
        let items = self.fetch("entities", "name", names).await?;
        items
            .iter()
            .map(|item| EntityMetadata::from_json(item).map_err(SdkError::from))
            .collect()
    }

    /// Field metadata of the named entity types, or of all types when
    /// `entity_names` is empty.
    pub async fn fields(&self, entity_names: &[&str]) -> SdkResult<Vec<FieldMetadata>> {
        let items = self.fetch("fields", "entity_name", entity_names).await?;
        items
            .iter()
            .map(|item| FieldMetadata::from_json(item).map_err(SdkError::from))
            .collect()
    }

    async fn fetch(&self, kind: &str, filter_field: &str, names: &[&str]) -> SdkResult<Vec<Value>> {
        let mut query = CollectionQuery::new();
        if let Some(filter) = Query::in_list(filter_field, names.iter().copied()) {
            query = query.query(filter);
        }
        let url = query.to_url(&format!("{}/{kind}", self.url));

        let response = self.octane.send(HttpRequest::get(url)).await?;
        let mut body: Value = response.json()?;
        match body.get_mut("data").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(SdkError::UnexpectedResponse(format!(
                "{kind} metadata response has no data array"
            ))),
        }
    }
}
