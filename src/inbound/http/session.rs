//! Session-backed caller identity.
//!
//! The cookie stores only the caller's id; handlers resolve the full user
//! through the directory when they need more. An unreadable or tampered
//! value is treated as an anonymous session rather than a server error, so
//! stale cookies from old deployments simply force a fresh login.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

pub(crate) const CALLER_ID_KEY: &str = "caller_id";

/// The caller's session, narrowed to the operations handlers perform.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record a successful login by storing the caller's id.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(CALLER_ID_KEY, user_id)
            .map_err(|error| Error::internal(format!("failed to write session: {error}")))
    }

    /// Identify the caller, or `None` when the session is anonymous.
    pub fn caller_id(&self) -> Option<UserId> {
        match self.0.get::<UserId>(CALLER_ID_KEY) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!("discarding unreadable session value: {error}");
                None
            }
        }
    }

    /// Identify the caller or reject the request as unauthenticated.
    pub fn require_caller(&self) -> Result<UserId, Error> {
        self.caller_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
