use crate::error::{SdkError, SdkResult};
use octane_transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Connection settings for one workspace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OctaneConfig {
    pub shared_space_id: String,
    pub workspace_id: String,
    #[serde(flatten)]
    pub transport: TransportConfig,
}

impl OctaneConfig {
    pub fn new(
        server_url: impl Into<String>,
        shared_space_id: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            shared_space_id: shared_space_id.into(),
            workspace_id: workspace_id.into(),
            transport: TransportConfig::new(server_url),
        }
    }

    pub fn server_url(&self) -> &str {
        self.transport.server_root()
    }

    /// Checks that the server and both ids are present.
    pub fn validate(&self) -> SdkResult<()> {
        let server = self.server_url();
        if server.is_empty() {
            return Err(SdkError::Config("server URL is empty".to_string()));
        }
        if !(server.starts_with("http://") || server.starts_with("https://")) {
            return Err(SdkError::Config(format!(
                "server URL must start with http:// or https://: {server}"
            )));
        }
        if self.shared_space_id.trim().is_empty() {
            return Err(SdkError::Config("shared space id is missing".to_string()));
        }
        if self.workspace_id.trim().is_empty() {
            return Err(SdkError::Config("workspace id is missing".to_string()));
        }
        Ok(())
    }

    /// `<server>/api/shared_spaces/<sid>/workspaces/<wid>`
    pub fn workspace_url(&self) -> String {
        format!(
            "{}/api/shared_spaces/{}/workspaces/{}",
            self.server_url(),
            self.shared_space_id,
            self.workspace_id
        )
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.workspace_url(), collection.trim_matches('/'))
    }
}
