//! Builders for the HTTP state from configured adapters or fixtures.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use collabdoc::domain::DocumentsService;
use collabdoc::domain::ports::{
    DocumentRepository, DocumentsCommand, DocumentsQuery, FixtureDocuments, FixtureLoginService,
    FixtureNotificationSender, FixtureUsersQuery, NotificationSender, ShareNotification,
    UserDirectory, UsersQuery,
};
use collabdoc::inbound::http::state::HttpState;
use collabdoc::outbound::notify::HttpMailer;
use collabdoc::outbound::persistence::{
    DbPool, DieselDocumentRepository, DieselLoginService, DieselUserDirectory,
};

use super::ServerConfig;

/// Ports served by a single `DocumentsService` instance.
struct DocumentPorts {
    users: Arc<dyn UsersQuery>,
    documents_query: Arc<dyn DocumentsQuery>,
    documents_command: Arc<dyn DocumentsCommand>,
    share_notification: Arc<dyn ShareNotification>,
}

fn cast_document_ports<R, U, N>(service: Arc<DocumentsService<R, U, N>>) -> DocumentPorts
where
    R: DocumentRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationSender + 'static,
{
    DocumentPorts {
        users: service.clone(),
        documents_query: service.clone(),
        documents_command: service.clone(),
        share_notification: service,
    }
}

fn build_notifier(config: &ServerConfig) -> std::io::Result<Option<HttpMailer>> {
    let Some(mailer) = &config.mailer else {
        warn!("no mail gateway configured; share notifications will be dropped");
        return Ok(None);
    };
    let mailer = HttpMailer::new(mailer.endpoint.clone(), mailer.public_base_url.clone())
        .map_err(|err| std::io::Error::other(format!("mail gateway client failed: {err}")))?;
    Ok(Some(mailer))
}

fn build_document_ports(config: &ServerConfig, pool: &DbPool) -> std::io::Result<DocumentPorts> {
    let documents = Arc::new(DieselDocumentRepository::new(pool.clone()));
    let users = Arc::new(DieselUserDirectory::new(pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let ports = match build_notifier(config)? {
        Some(mailer) => cast_document_ports(Arc::new(DocumentsService::new(
            documents,
            users,
            Arc::new(mailer),
            clock,
        ))),
        None => cast_document_ports(Arc::new(DocumentsService::new(
            documents,
            users,
            Arc::new(FixtureNotificationSender),
            clock,
        ))),
    };
    Ok(ports)
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
///
/// With a database pool, login and document ports are backed by SQL adapters
/// and share notifications flow through the mail gateway when one is
/// configured. Without a pool every port falls back to fixtures so the server
/// can still start for smoke tests.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => {
            let ports = build_document_ports(config, pool)?;
            HttpState {
                login: Arc::new(DieselLoginService::new(pool.clone())),
                users: ports.users,
                documents_query: ports.documents_query,
                documents_command: ports.documents_command,
                share_notification: ports.share_notification,
            }
        }
        None => {
            warn!("no database configured; serving fixture-backed ports");
            let documents = Arc::new(FixtureDocuments);
            HttpState {
                login: Arc::new(FixtureLoginService),
                users: Arc::new(FixtureUsersQuery),
                documents_query: documents.clone(),
                documents_command: documents.clone(),
                share_notification: documents,
            }
        }
    };
    Ok(web::Data::new(state))
}
