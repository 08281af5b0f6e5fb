//! Ports of the hexagonal architecture.
//!
//! Driving ports ([`documents`], [`login_service`]) are implemented by
//! domain services and consumed by inbound adapters. Driven ports
//! ([`document_repository`], [`user_directory`], [`notification_sender`])
//! are consumed by domain services and implemented by outbound adapters.

pub mod document_repository;
pub mod documents;
pub mod login_service;
mod macros;
pub mod notification_sender;
pub mod user_directory;
pub mod users;

pub use document_repository::{
    DocumentRepository, DocumentRepositoryError, FixtureDocumentRepository,
};
pub use documents::{DocumentsCommand, DocumentsQuery, FixtureDocuments, ShareNotification};
pub use login_service::{
    FixtureLoginService, LoginCredentials, LoginService, LoginValidationError,
};
pub use notification_sender::{
    FixtureNotificationSender, NotificationSender, NotificationSenderError,
};
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
pub use users::{FixtureUsersQuery, UsersQuery};

#[cfg(test)]
pub use document_repository::MockDocumentRepository;
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
