//! Outbound adapters implementing the domain's driven ports.

pub mod notify;
pub mod persistence;
