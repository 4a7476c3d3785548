//! Request and response values passed through the transport.

use crate::error::{TransportError, TransportResult};
use crate::multipart::BinaryContent;
use crate::JSON_MEDIA_TYPE;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// HTTP verbs the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    /// POST with a multipart entity and binary body.
    PostBinary,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::PostBinary => "POST_BINARY",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "POST_BINARY" => Ok(RequestMethod::PostBinary),
            "PUT" => Ok(RequestMethod::Put),
            "DELETE" => Ok(RequestMethod::Delete),
            _ => Err(TransportError::UnsupportedRequestMethod(s.to_string())),
        }
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Text { content: String, content_type: String },
    Multipart { entity_json: String, binary: BinaryContent },
}

/// A request to be sent through a [`crate::SessionTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: RequestMethod,
    url: String,
    accept: String,
    headers: Vec<(String, String)>,
    body: RequestBody,
}

impl HttpRequest {
    fn new(method: RequestMethod, url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            url: url.into(),
            accept: JSON_MEDIA_TYPE.to_string(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, url, RequestBody::Empty)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, url, RequestBody::Empty)
    }

    /// POST with a JSON body.
    pub fn post(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, url, json_body(content))
    }

    /// PUT with a JSON body.
    pub fn put(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(RequestMethod::Put, url, json_body(content))
    }

    /// Multipart POST carrying an entity and its binary content.
    pub fn post_binary(url: impl Into<String>, entity_json: impl Into<String>, binary: BinaryContent) -> Self {
        Self::new(
            RequestMethod::PostBinary,
            url,
            RequestBody::Multipart {
                entity_json: entity_json.into(),
                binary,
            },
        )
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Overrides the content type of a text body. No effect on other bodies.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        if let RequestBody::Text { content_type: current, .. } = &mut self.body {
            *current = content_type.into();
        }
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

fn json_body(content: impl Into<String>) -> RequestBody {
    RequestBody::Text {
        content: content.into(),
        content_type: JSON_MEDIA_TYPE.to_string(),
    }
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Body decoded as UTF-8, lossily.
    pub body: String,
    /// Body bytes exactly as received.
    pub raw: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> TransportResult<T> {
        serde_json::from_slice(&self.raw)
            .map_err(|e| TransportError::Model(octane_model::ModelError::Serialization(e)))
    }
}
