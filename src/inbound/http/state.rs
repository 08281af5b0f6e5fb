//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentsCommand, DocumentsQuery, FixtureDocuments, FixtureLoginService, FixtureUsersQuery,
    LoginService, ShareNotification, UsersQuery,
};

/// Dependency bundle for HTTP handlers, one field per driving port.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub documents_query: Arc<dyn DocumentsQuery>,
    pub documents_command: Arc<dyn DocumentsCommand>,
    pub share_notification: Arc<dyn ShareNotification>,
}

impl Default for HttpState {
    /// Fixture-backed state for wiring tests and credential-less startups.
    fn default() -> Self {
        let documents = Arc::new(FixtureDocuments);
        Self {
            login: Arc::new(FixtureLoginService),
            users: Arc::new(FixtureUsersQuery),
            documents_query: documents.clone(),
            documents_command: documents.clone(),
            share_notification: documents,
        }
    }
}
