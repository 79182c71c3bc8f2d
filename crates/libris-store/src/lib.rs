//! libris-store: Relational storage gateway for the catalog.
//!
//! This crate is the single access point for catalog reads. Every read
//! resolves its associations eagerly inside one scoped session, so callers
//! receive complete records and never hold a connection.

pub mod client;
pub mod queries;
pub mod schema;

pub use client::{StoreClient, StoreConfig, StoreError};
