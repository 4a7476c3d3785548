//! Entry point: an authenticated connection to one workspace.

use crate::attachments::Attachments;
use crate::config::OctaneConfig;
use crate::entity_list::EntityList;
use crate::error::SdkResult;
use crate::metadata::Metadata;
use octane_transport::{Authentication, HttpRequest, HttpResponse, SessionTransport};
use std::sync::Arc;
use tracing::info;

/// An authenticated connection to one Octane workspace.
///
/// Cloning is cheap; clones share one session.
#[derive(Clone)]
pub struct Octane {
    config: Arc<OctaneConfig>,
    transport: Arc<SessionTransport>,
}

impl Octane {
    pub fn builder(auth: impl Authentication + 'static) -> OctaneBuilder {
        OctaneBuilder {
            auth: Arc::new(auth),
            config: OctaneConfig::default(),
        }
    }

    /// Validates `config`, signs in and returns the connected client.
    pub async fn connect(config: OctaneConfig, auth: Arc<dyn Authentication>) -> SdkResult<Self> {
        config.validate()?;
        let transport = SessionTransport::new(config.transport.clone())?;
        transport.authenticate(auth).await?;
        info!(
            shared_space = %config.shared_space_id,
            workspace = %config.workspace_id,
            "Connected to {}",
            config.server_url()
        );
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    pub fn config(&self) -> &OctaneConfig {
        &self.config
    }

    pub fn transport(&self) -> &SessionTransport {
        &self.transport
    }

    /// Service over the named collection (e.g. `"defects"`).
    pub fn entity_list(&self, collection: &str) -> EntityList<'_> {
        EntityList::new(self, self.config.collection_url(collection))
    }

    pub fn attachments(&self) -> Attachments<'_> {
        Attachments::new(self, self.config.collection_url("attachments"))
    }

    pub fn metadata(&self) -> Metadata<'_> {
        Metadata::new(self, self.config.collection_url("metadata"))
    }

    /// Ends the session. The client cannot be used afterwards.
    pub async fn sign_out(&self) -> SdkResult<()> {
        Ok(self.transport.sign_out().await?)
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> SdkResult<HttpResponse> {
        Ok(self.transport.execute(&request).await?)
    }
}

/// Builder for [`Octane`].
pub struct OctaneBuilder {
    auth: Arc<dyn Authentication>,
    config: OctaneConfig,
}

impl OctaneBuilder {
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.config.transport.server_url = url.into();
        self
    }

    pub fn shared_space(mut self, id: impl ToString) -> Self {
        self.config.shared_space_id = id.to_string();
        self
    }

    pub fn workspace(mut self, id: impl ToString) -> Self {
        self.config.workspace_id = id.to_string();
        self
    }

    pub fn read_timeout_secs(mut self, secs: u64) -> Self {
        self.config.transport.read_timeout_secs = secs;
        self
    }

    /// Replaces every setting made so far.
    pub fn config(mut self, config: OctaneConfig) -> Self {
        self.config = config;
        self
    }

    /// Signs in and returns the connected client.
    pub async fn build(self) -> SdkResult<Octane> {
        Octane::connect(self.config, self.auth).await
    }
}
