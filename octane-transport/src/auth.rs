//! Credentials supplied to the sign-in endpoint.

use serde_json::json;
use std::fmt;

/// Source of the sign-in payload.
///
/// Implementations must be cheap to call repeatedly: the transport asks for
/// the payload again whenever it has to re-authenticate.
pub trait Authentication: Send + Sync {
    /// JSON body posted to the sign-in endpoint.
    fn authentication_string(&self) -> String;

    /// Value of the client-type header, if this client identifies itself.
    fn client_header(&self) -> Option<String> {
        None
    }
}

/// Sign-in with a user name and password.
#[derive(Clone)]
pub struct UserAuthentication {
    user: String,
    password: String,
    client_type: Option<String>,
}

impl UserAuthentication {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            client_type: None,
        }
    }

    pub fn with_client_type(mut self, client_type: impl Into<String>) -> Self {
        self.client_type = Some(client_type.into());
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl Authentication for UserAuthentication {
    fn authentication_string(&self) -> String {
        json!({ "user": self.user, "password": self.password }).to_string()
    }

    fn client_header(&self) -> Option<String> {
        self.client_type.clone()
    }
}

impl fmt::Debug for UserAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAuthentication")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("client_type", &self.client_type)
            .finish()
    }
}

/// Sign-in with API access keys.
#[derive(Clone)]
pub struct ClientAuthentication {
    client_id: String,
    client_secret: String,
    client_type: Option<String>,
}

impl ClientAuthentication {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client_type: None,
        }
    }

    pub fn with_client_type(mut self, client_type: impl Into<String>) -> Self {
        self.client_type = Some(client_type.into());
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl Authentication for ClientAuthentication {
    fn authentication_string(&self) -> String {
        json!({ "client_id": self.client_id, "client_secret": self.client_secret }).to_string()
    }

    fn client_header(&self) -> Option<String> {
        self.client_type.clone()
    }
}

impl fmt::Debug for ClientAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAuthentication")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("client_type", &self.client_type)
            .finish()
    }
}
