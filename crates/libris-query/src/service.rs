//! The catalog query service: one storage read, then materialization.

use libris_core::{AuthorView, BookView, UserView};
use libris_store::StoreClient;
use uuid::Uuid;

use crate::error::Result;
use crate::materialize::{to_author_view, to_book_view, to_user_view};

/// Serves the catalog's read queries.
///
/// Holds no per-request state; clones share the store's pool.
#[derive(Clone)]
pub struct CatalogService {
    store: StoreClient,
}

impl CatalogService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Every book, each with its author and that author's books.
    ///
    /// Storage order is kept. A storage failure fails the whole call.
    #[tracing::instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn all_books(&self) -> Result<Vec<BookView>> {
        let records = self.store.fetch_all_books().await.map_err(|e| {
            tracing::warn!(error = %e, "Book query failed");
            e
        })?;

        let views: Vec<BookView> = records.iter().map(|r| to_book_view(r, true)).collect();
        tracing::info!(count = views.len(), "Served books");
        Ok(views)
    }

    /// Every author with its books, each book truncated.
    #[tracing::instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn all_authors(&self) -> Result<Vec<AuthorView>> {
        let records = self.store.fetch_all_authors().await.map_err(|e| {
            tracing::warn!(error = %e, "Author query failed");
            e
        })?;

        let views: Vec<AuthorView> = records.iter().map(|r| to_author_view(r, true)).collect();
        tracing::info!(count = views.len(), "Served authors");
        Ok(views)
    }

    /// Every user with its reading list, each book truncated.
    #[tracing::instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn all_users(&self) -> Result<Vec<UserView>> {
        let records = self.store.fetch_all_users().await.map_err(|e| {
            tracing::warn!(error = %e, "User query failed");
            e
        })?;

        let views: Vec<UserView> = records.iter().map(|r| to_user_view(r, true)).collect();
        tracing::info!(count = views.len(), "Served users");
        Ok(views)
    }
}
