//! Driving port for user profile reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read-side use-cases over users.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Resolve the authenticated user's profile.
    async fn current_user(&self, id: &UserId) -> Result<User, Error>;
}

/// Fixture implementation that knows no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        Err(Error::not_found(format!("no user with id {id}")))
    }
}
