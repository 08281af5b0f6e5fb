//! PostgreSQL persistence adapters built on Diesel.

mod diesel_document_repository;
mod diesel_login_service;
mod diesel_user_directory;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_login_service::DieselLoginService;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolError};
