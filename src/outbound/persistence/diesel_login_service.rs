//! Diesel-backed `LoginService` verifying bcrypt password hashes.
//!
//! Lookup failures and hash mismatches both surface as the same
//! unauthorized error so responses do not reveal which emails are
//! registered.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Error;
use crate::domain::ports::{LoginCredentials, LoginService};

use super::diesel_user_directory::row_to_user;
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `LoginService` port.
#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

impl DieselLoginService {
    /// Create a new service with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> Error {
    Error::service_unavailable(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> Error {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            Error::service_unavailable("database connection error")
        }
        _ => Error::internal("database error"),
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

async fn verify_password(password: String, hash: String) -> Result<bool, Error> {
    // Bcrypt verification is CPU-bound; keep it off the async executor.
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password verification failed: {err}")))
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<crate::domain::User, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(credentials.email().as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Err(invalid_credentials());
        };

        let hash = row.password_hash.clone();
        if !verify_password(credentials.password().to_owned(), hash).await? {
            return Err(invalid_credentials());
        }

        let user = row_to_user(row)
            .map_err(|err| Error::internal(format!("corrupt user record: {err}")))?;
        tracing::info!(user_id = %user.id(), "user authenticated");
        Ok(user)
    }
}
