//! Typed resource gateway
//!
//! One module per resource family (auth, labs, equipment, lab works,
//! reservations), all as `impl ApiClient` blocks over the same HTTP
//! layer. Every call runs through an interceptor that reacts to a 401
//! by clearing the session and broadcasting
//! [`SessionEvent::Expired`](crate::SessionEvent::Expired); the caller
//! still receives [`ClientError::Unauthorized`] but is expected to let
//! the session owner handle it.

mod auth;
mod equipment;
mod lab_works;
mod labs;
mod reservations;

use crate::{ClientConfig, ClientError, ClientResult, HttpClient, SessionHandle};

/// Gateway facade owning the HTTP layer and the session handle
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: HttpClient,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ClientResult<Self> {
        let http = HttpClient::new(config, session.clone())?;
        Ok(Self { http, session })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Forced-logout interceptor: any 401 clears the session and
    /// notifies subscribers before the error is returned.
    pub(crate) fn intercept<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ClientError::Unauthorized) = &result {
            self.session.expire();
        }
        result
    }
}
