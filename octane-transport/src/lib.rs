//! Authenticated HTTP transport for the Octane REST API.
//!
//! # Session model
//!
//! The service authenticates a client once (`POST /authentication/sign_in`)
//! and from then on recognises it by the `LWSSO_COOKIE_KEY` cookie. The
//! server may hand out a fresh cookie on any response; [`SessionTransport`]
//! picks it up silently and sends it with every following request.
//!
//! When a session expires the server answers 401 or 403. The transport then
//! signs in again with the last credentials that worked and retries the
//! request exactly once. Any other failure is returned to the caller as is.
//!
//! ```text
//!   Unauthenticated ──authenticate ok──▶ Authenticated
//!         ▲                                   │
//!         └──── sign_out / sign-in rejected ──┘
//! ```
//!
//! # Concurrency
//!
//! Session state sits behind a `tokio::sync::RwLock`. Requests only hold the
//! lock while reading or renewing the cookie, so several requests on one
//! transport can be in flight at once. Cookie renewal from concurrent
//! responses is last-writer-wins.

mod auth;
mod config;
mod error;
pub mod multipart;
mod request;
mod session;
mod transport;

pub use auth::{Authentication, ClientAuthentication, UserAuthentication};
pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use multipart::{BinaryContent, MULTIPART_BOUNDARY, encode_multipart, multipart_content_type};
pub use request::{HttpRequest, HttpResponse, RequestBody, RequestMethod};
pub use session::session_cookie_from;
pub use transport::SessionTransport;

/// Name of the cookie carrying the session token.
pub const LWSSO_COOKIE_KEY: &str = "LWSSO_COOKIE_KEY";

/// Header identifying the kind of client talking to the service.
pub const HPE_CLIENT_TYPE: &str = "HPECLIENTTYPE";

/// Default media type for request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";
