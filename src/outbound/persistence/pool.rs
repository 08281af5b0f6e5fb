//! Async PostgreSQL connection pool shared by the persistence adapters.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const IDLE_CONNECTIONS: u32 = 2;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// The pool could not be built or had no connection to hand out.
///
/// The adapters treat both cases the same way: the database is unreachable,
/// so the operation surfaces as a connection-class port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("database pool unavailable: {message}")]
pub struct PoolError {
    message: String,
}

impl PoolError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn idle_target(max_size: u32) -> u32 {
    IDLE_CONNECTIONS.min(max_size)
}

/// Cloneable handle on a bb8 pool of async Diesel connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Connect to the database at `database_url`, holding at most `max_size`
    /// connections.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when the pool cannot be built or the initial
    /// connection fails.
    pub async fn connect(database_url: &str, max_size: u32) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

        let inner = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(idle_target(max_size)))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| PoolError::new(err.to_string()))?;

        Ok(Self { inner })
    }

    /// Check out a connection, waiting up to the checkout timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when no connection becomes available in time.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::new(err.to_string()))
    }
}
