//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use collabdoc::outbound::persistence::DbPool;
use std::net::SocketAddr;
use url::Url;

/// Mail gateway settings for share notifications.
pub struct MailerConfig {
    pub(crate) endpoint: Url,
    pub(crate) public_base_url: Url,
}

impl MailerConfig {
    /// Pair a gateway endpoint with the public base URL used in document links.
    #[must_use]
    pub fn new(endpoint: Url, public_base_url: Url) -> Self {
        Self {
            endpoint,
            public_base_url,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) mailer: Option<MailerConfig>,
}

impl ServerConfig {
    /// Construct a server configuration from session and binding settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            mailer: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for
    /// login, user lookup, and document storage.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a mail gateway for share notifications.
    ///
    /// Without one the server logs notifications instead of delivering them.
    #[must_use]
    pub fn with_mailer(mut self, mailer: MailerConfig) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by integration tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
