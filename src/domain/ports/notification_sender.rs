//! Driven port for out-of-band share notifications.
//!
//! Delivery is best-effort and decoupled from document state: a failure
//! surfaces to the caller but never rolls back a persisted mutation.

use async_trait::async_trait;

use crate::domain::{Document, EmailAddress};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by notification sender adapters.
    pub enum NotificationSenderError {
        /// The delivery endpoint could not be reached.
        Transport { message: String } =>
            "notification transport failed: {message}",
        /// The delivery endpoint did not answer in time.
        Timeout { message: String } =>
            "notification delivery timed out: {message}",
        /// The delivery endpoint refused the message.
        Rejected { message: String } =>
            "notification rejected: {message}",
    }
}

/// Port for sending a share notification about a document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver a share notification for `document` to `recipient`.
    async fn send(
        &self,
        recipient: &EmailAddress,
        document: &Document,
    ) -> Result<(), NotificationSenderError>;
}

/// Fixture implementation that silently accepts every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSender;

#[async_trait]
impl NotificationSender for FixtureNotificationSender {
    async fn send(
        &self,
        _recipient: &EmailAddress,
        _document: &Document,
    ) -> Result<(), NotificationSenderError> {
        Ok(())
    }
}
