//! CRUD over one entity collection.
//!
//! ```text
//! entity_list("defects")
//!   .get()            GET    <collection>?fields=..&limit=..&offset=..&order_by=..&query=".."
//!   .create()         POST   <collection>          {"data":[...]}
//!   .update()         PUT    <collection>          {"data":[...]}
//!   .delete()         DELETE <collection>?query=".."
//!   .at(id).get()     GET    <collection>/<id>?fields=..
//!   .at(id).update()  PUT    <collection>/<id>     {...}
//!   .at(id).delete()  DELETE <collection>/<id>
//! ```

use crate::client::Octane;
use crate::error::SdkResult;
use octane_model::{EntityCollection, EntityModel, ModelParser};
use octane_query::{CollectionQuery, OrderBy, Query};
use octane_transport::HttpRequest;
use tracing::debug;

/// Service bound to one collection URL.
pub struct EntityList<'a> {
    octane: &'a Octane,
    url: String,
}

impl<'a> EntityList<'a> {
    pub(crate) fn new(octane: &'a Octane, url: String) -> Self {
        Self { octane, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn get(&self) -> GetEntities<'a> {
        GetEntities {
            octane: self.octane,
            url: self.url.clone(),
            query: CollectionQuery::new(),
        }
    }

    pub fn create(&self) -> CreateEntities<'a> {
        CreateEntities {
            octane: self.octane,
            url: self.url.clone(),
            entities: Vec::new(),
        }
    }

    pub fn update(&self) -> UpdateEntities<'a> {
        UpdateEntities {
            octane: self.octane,
            url: self.url.clone(),
            entities: Vec::new(),
            query: None,
        }
    }

    pub fn delete(&self) -> DeleteEntities<'a> {
        DeleteEntities {
            octane: self.octane,
            url: self.url.clone(),
            query: None,
        }
    }

    /// Service for the single entity with the given id.
    pub fn at(&self, id: impl ToString) -> EntityService<'a> {
        EntityService {
            octane: self.octane,
            url: format!("{}/{}", self.url, id.to_string()),
        }
    }
}

/// Paged, filtered read of a collection.
pub struct GetEntities<'a> {
    octane: &'a Octane,
    url: String,
    query: CollectionQuery,
}

impl GetEntities<'_> {
    pub fn add_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = self.query.fields(fields);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    /// Sorts by `field`. A later call replaces an earlier one.
    pub fn add_order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        let order = if ascending {
            OrderBy::ascending(field)
        } else {
            OrderBy::descending(field)
        };
        self.query = self.query.order_by(order);
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = self.query.query(query);
        self
    }

    /// The URL this request will be sent to.
    pub fn url(&self) -> String {
        self.query.to_url(&self.url)
    }

    pub async fn execute(self) -> SdkResult<EntityCollection> {
        let response = self.octane.send(HttpRequest::get(self.url())).await?;
        let collection = ModelParser::collection_from_str(&response.body)?;
        debug!(
            received = collection.entities.len(),
            total = collection.total_count,
            "Fetched {}",
            self.url
        );
        Ok(collection)
    }
}

/// Bulk create.
pub struct CreateEntities<'a> {
    octane: &'a Octane,
    url: String,
    entities: Vec<EntityModel>,
}

impl CreateEntities<'_> {
    pub fn entities(mut self, entities: impl IntoIterator<Item = EntityModel>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Returns the created entities as echoed by the server.
    pub async fn execute(self) -> SdkResult<EntityCollection> {
        let body = ModelParser::collection_to_json(&self.entities).to_string();
        let response = self.octane.send(HttpRequest::post(self.url, body)).await?;
        Ok(ModelParser::collection_from_str(&response.body)?)
    }
}

/// Bulk update. Each entity must carry its `id`, or a query selects the
/// entities to which the single given entity's fields are applied.
pub struct UpdateEntities<'a> {
    octane: &'a Octane,
    url: String,
    entities: Vec<EntityModel>,
    query: Option<Query>,
}

impl UpdateEntities<'_> {
    pub fn entities(mut self, entities: impl IntoIterator<Item = EntityModel>) -> Self {
        self.entities.extend(entities);
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub async fn execute(self) -> SdkResult<EntityCollection> {
        let url = match self.query {
            Some(query) => CollectionQuery::new().query(query).to_url(&self.url),
            None => self.url,
        };
        let body = ModelParser::collection_to_json(&self.entities).to_string();
        let response = self.octane.send(HttpRequest::put(url, body)).await?;
        Ok(ModelParser::collection_from_str(&response.body)?)
    }
}

/// Bulk delete of the entities matching a query.
pub struct DeleteEntities<'a> {
    octane: &'a Octane,
    url: String,
    query: Option<Query>,
}

impl DeleteEntities<'_> {
    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub async fn execute(self) -> SdkResult<()> {
        let url = match self.query {
            Some(query) => CollectionQuery::new().query(query).to_url(&self.url),
            None => self.url,
        };
        self.octane.send(HttpRequest::delete(url)).await?;
        Ok(())
    }
}

/// Operations on one entity.
pub struct EntityService<'a> {
    octane: &'a Octane,
    url: String,
}

impl<'a> EntityService<'a> {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn get(&self) -> GetEntity<'a> {
        GetEntity {
            octane: self.octane,
            url: self.url.clone(),
            fields: Vec::new(),
        }
    }

    /// Replaces the given fields of this entity and returns the result.
    pub async fn update(&self, entity: &EntityModel) -> SdkResult<EntityModel> {
        let body = ModelParser::to_json_string(entity);
        let response = self.octane.send(HttpRequest::put(self.url.as_str(), body)).await?;
        Ok(ModelParser::entity_from_str(&response.body)?)
    }

    pub async fn delete(&self) -> SdkResult<()> {
        self.octane.send(HttpRequest::delete(self.url.as_str())).await?;
        Ok(())
    }
}

/// Read of one entity.
pub struct GetEntity<'a> {
    octane: &'a Octane,
    url: String,
    fields: Vec<String>,
}

impl GetEntity<'_> {
    pub fn add_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub async fn execute(self) -> SdkResult<EntityModel> {
        let url = CollectionQuery::new().fields(self.fields).to_url(&self.url);
        let response = self.octane.send(HttpRequest::get(url)).await?;
        Ok(ModelParser::entity_from_str(&response.body)?)
    }
}
