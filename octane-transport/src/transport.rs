//! Session-aware HTTP transport.

use crate::auth::Authentication;
use crate::config::TransportConfig;
use crate::error::{TransportError, TransportResult, is_auth_status};
use crate::multipart::{encode_multipart, multipart_content_type};
use crate::request::{HttpRequest, HttpResponse, RequestBody, RequestMethod};
use crate::session::{SessionState, session_cookie_from};
use crate::{HPE_CLIENT_TYPE, JSON_MEDIA_TYPE, LWSSO_COOKIE_KEY};
use octane_model::{ErrorModel, ModelParser};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

/// Where a request is in its retry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    AfterReauthentication,
}

/// HTTP transport holding one authenticated session.
///
/// Requests may be issued concurrently from several tasks through a shared
/// reference. Each transport owns its session; transports never share
/// cookies with each other.
pub struct SessionTransport {
    config: TransportConfig,
    client: Client,
    session: RwLock<SessionState>,
}

impl SessionTransport {
    /// Creates an unauthenticated transport.
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.read_timeout())
            .build()
            .map_err(|e| TransportError::TransportFailure(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            session: RwLock::new(SessionState::default()),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Returns true once a sign-in has produced a session cookie.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.cookie.is_some()
    }

    /// Current session token, if any.
    pub async fn session_cookie(&self) -> Option<String> {
        self.session.read().await.cookie.clone()
    }

    /// Signs in with the given credentials.
    ///
    /// On success the credentials are kept for transparent re-authentication.
    /// On failure they are forgotten along with any session cookie.
    pub async fn authenticate(&self, auth: Arc<dyn Authentication>) -> TransportResult<()> {
        self.session.write().await.credentials = Some(Arc::clone(&auth));

        let url = self.config.sign_in_url();
        debug!("Signing in at {url}");

        // The payload carries secrets and is never logged.
        let mut builder = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .body(auth.authentication_string());
        if let Some(client_type) = auth.client_header() {
            builder = builder.header(HPE_CLIENT_TYPE, client_type);
        }
        let outcome = self.dispatch(builder).await;

        match outcome {
            Ok(response) if response.is_success() => {
                info!("Signed in to {}", self.config.server_root());
                Ok(())
            }
            Ok(response) => {
                warn!(status = response.status, "Sign-in rejected");
                self.session.write().await.clear();
                Err(TransportError::AuthenticationFailed(ModelParser::error_from_body(
                    &response.body,
                )))
            }
            Err(e) => {
                warn!("Sign-in failed: {e}");
                self.session.write().await.clear();
                Err(TransportError::AuthenticationFailed(
                    ErrorModel::from_description(e.to_string()),
                ))
            }
        }
    }

    /// Ends the session.
    ///
    /// Local session state is cleared whether or not the server call succeeds.
    pub async fn sign_out(&self) -> TransportResult<()> {
        let url = self.config.sign_out_url();
        debug!("Signing out at {url}");

        let builder = self.decorate(self.client.post(&url)).await;
        let outcome = self.dispatch(builder).await;
        self.session.write().await.clear();

        let response = outcome?;
        if response.is_success() {
            info!("Signed out of {}", self.config.server_root());
            Ok(())
        } else {
            Err(TransportError::Server {
                status: response.status,
                error: ModelParser::error_from_body(&response.body),
            })
        }
    }

    /// Sends a request, re-authenticating and retrying once if the session
    /// has expired.
    ///
    /// Non-success statuses other than 401/403 are returned without retry.
    /// If re-authentication itself fails, the original rejection is returned.
    pub async fn execute(&self, request: &HttpRequest) -> TransportResult<HttpResponse> {
        let mut attempt = Attempt::First;
        loop {
            let builder = self.decorate(self.build(request)).await;
            debug!("{} {}", request.method(), request.url());
            let response = self.dispatch(builder).await?;

            if response.is_success() {
                return Ok(response);
            }

            let status = response.status;
            let error = ModelParser::error_from_body(&response.body);

            match attempt {
                Attempt::First if is_auth_status(status) => {
                    let credentials = self.session.read().await.credentials.clone();
                    let Some(credentials) = credentials else {
                        return Err(TransportError::Server { status, error });
                    };

                    debug!(status, "Session rejected, re-authenticating");
                    if let Err(e) = self.authenticate(credentials).await {
                        warn!("Re-authentication failed: {e}");
                        return Err(TransportError::Server { status, error });
                    }
                    attempt = Attempt::AfterReauthentication;
                }
                Attempt::AfterReauthentication if is_auth_status(status) => {
                    warn!(status, "Request rejected again after re-authentication");
                    return Err(TransportError::RetryExhausted { status, error });
                }
                _ => return Err(TransportError::Server { status, error }),
            }
        }
    }

    /// [`execute`](Self::execute) bounded by a total deadline covering any
    /// retry.
    pub async fn execute_with_deadline(
        &self,
        request: &HttpRequest,
        deadline: Duration,
    ) -> TransportResult<HttpResponse> {
        tokio::time::timeout(deadline, self.execute(request))
            .await
            .map_err(|_| TransportError::DeadlineExceeded(deadline))?
    }

    fn build(&self, request: &HttpRequest) -> RequestBuilder {
        let builder = match request.body() {
            RequestBody::Empty => match request.method() {
                RequestMethod::Delete => self.client.delete(request.url()),
                _ => self.client.get(request.url()),
            },
            RequestBody::Text { content, content_type } => {
                trace!("Request content: {content}");
                let builder = match request.method() {
                    RequestMethod::Put => self.client.put(request.url()),
                    _ => self.client.post(request.url()),
                };
                builder.header(CONTENT_TYPE, content_type).body(content.clone())
            }
            RequestBody::Multipart { entity_json, binary } => {
                trace!("Request entity: {entity_json}");
                self.client
                    .post(request.url())
                    .header(CONTENT_TYPE, multipart_content_type())
                    .body(encode_multipart(entity_json, binary))
            }
        };

        request
            .headers()
            .iter()
            .fold(builder.header(ACCEPT, request.accept()), |b, (name, value)| {
                b.header(name, value)
            })
    }

    /// Adds the session cookie and client-type header.
    async fn decorate(&self, mut builder: RequestBuilder) -> RequestBuilder {
        let session = self.session.read().await;
        if let Some(cookie) = &session.cookie {
            builder = builder.header(COOKIE, format!("{LWSSO_COOKIE_KEY}={cookie}"));
        }
        if let Some(client_type) = session.client_header() {
            builder = builder.header(HPE_CLIENT_TYPE, client_type);
        }
        builder
    }

    /// Sends one request, renews the cookie and reads the body.
    async fn dispatch(&self, builder: RequestBuilder) -> TransportResult<HttpResponse> {
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::TransportFailure(format!("request failed: {e}")))?;

        self.renew_cookie(response.headers()).await;

        let status = response.status().as_u16();
        let raw = response
            .bytes()
            .await
            .map_err(|e| TransportError::TransportFailure(format!("failed to read response: {e}")))?
            .to_vec();
        debug!(status, bytes = raw.len(), "Response received");

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&raw).into_owned(),
            raw,
        })
    }

    async fn renew_cookie(&self, headers: &HeaderMap) {
        let values = headers.get_all(SET_COOKIE).iter().filter_map(|v| v.to_str().ok());
        if let Some(token) = session_cookie_from(values) {
            let mut session = self.session.write().await;
            if session.cookie.as_deref() != Some(token.as_str()) {
                trace!("Session cookie renewed");
                session.cookie = Some(token);
            }
        }
    }
}
