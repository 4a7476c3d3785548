//! Per-transport session state.

use crate::auth::Authentication;
use crate::LWSSO_COOKIE_KEY;
use cookie::Cookie;
use std::sync::Arc;
use tracing::debug;

/// Cookie and credentials of the current session.
#[derive(Default)]
pub(crate) struct SessionState {
    pub cookie: Option<String>,
    /// Credentials of the last sign-in attempt, reused to re-authenticate.
    pub credentials: Option<Arc<dyn Authentication>>,
}

impl SessionState {
    pub fn client_header(&self) -> Option<String> {
        self.credentials.as_ref().and_then(|auth| auth.client_header())
    }

    pub fn clear(&mut self) {
        self.cookie = None;
        self.credentials = None;
    }
}

/// Picks the session token out of `Set-Cookie` header values.
///
/// Values that fail to parse are skipped. When several values carry the
/// token, the last one wins.
pub fn session_cookie_from<'a, I>(set_cookie_values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found = None;
    for value in set_cookie_values {
        match Cookie::parse(value) {
            Ok(cookie) if cookie.name() == LWSSO_COOKIE_KEY => {
                found = Some(cookie.value().to_string());
            }
            Ok(_) => {}
            Err(e) => debug!("skipping unparseable Set-Cookie header: {e}"),
        }
    }
    found
}
