//! Domain model and use-case services.
//!
//! Everything in this module is transport- and storage-agnostic: inbound
//! adapters live under [`crate::inbound`], outbound adapters under
//! [`crate::outbound`], and they meet here through the traits in [`ports`].

pub mod document;
pub mod documents_service;
pub mod error;
pub mod ports;
pub mod user;

pub use document::{DEFAULT_TITLE, Document, DocumentId};
pub use documents_service::DocumentsService;
pub use error::{Error, ErrorCode};
pub use user::{DisplayName, EmailAddress, User, UserId, UserValidationError};

/// Result alias for use-case outcomes.
pub type ApiResult<T> = Result<T, Error>;
