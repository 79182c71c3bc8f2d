//! libris-core: Shared types, configuration, and error handling for Libris.
//!
//! This crate provides the foundational types used across all Libris components:
//! - Persisted entities (User, Author, Book) and their resolved records
//! - Response views (BookView, AuthorView, UserView)
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::LibrisConfig;
pub use error::LibrisError;
pub use types::{
    Author, AuthorRecord, AuthorView, Book, BookRecord, BookView, User, UserRecord, UserView,
};
