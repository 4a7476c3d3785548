//! Binary attachments.

use crate::client::Octane;
use crate::error::SdkResult;
use octane_model::{EntityCollection, EntityModel, ModelParser};
use octane_transport::{BinaryContent, HttpRequest};
use tracing::debug;

const OCTET_STREAM: &str = "application/octet-stream";

/// Service over the workspace's `attachments` collection.
pub struct Attachments<'a> {
    octane: &'a Octane,
    url: String,
}

impl<'a> Attachments<'a> {
    pub(crate) fn new(octane: &'a Octane, url: String) -> Self {
        Self { octane, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Uploads `data` together with the attachment entity (name, owner).
    pub async fn create(
        &self,
        entity: &EntityModel,
        data: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> SdkResult<EntityCollection> {
        debug!(bytes = data.len(), "Uploading attachment {filename}");
        let request = HttpRequest::post_binary(
            self.url.as_str(),
            ModelParser::to_json_string(entity),
            BinaryContent::new(data, content_type, filename),
        );
        let response = self.octane.send(request).await?;
        Ok(ModelParser::collection_from_str(&response.body)?)
    }

    /// Fetches the content of the attachment with the given id.
    pub async fn download(&self, id: impl ToString) -> SdkResult<Vec<u8>> {
        let url = format!("{}/{}", self.url, id.to_string());
        let response = self
            .octane
            .send(HttpRequest::get(url).with_accept(OCTET_STREAM))
            .await?;
        Ok(response.raw)
    }
}
