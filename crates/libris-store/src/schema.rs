//! Catalog table definitions.
//!
//! Tables: `users`, `authors`, `books` (FK to `authors`), and the
//! `reading_list` association between users and books. Creation is
//! idempotent (`IF NOT EXISTS`).

use crate::client::{StoreClient, StoreError};

impl StoreClient {
    /// Create the catalog tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        let key = surrogate_key_type(conn.backend_name());

        for stmt in schema_statements(key) {
            sqlx::query(&stmt).execute(&mut *conn).await?;
        }

        tracing::info!("Catalog schema ensured");
        Ok(())
    }
}

/// Column type for storage-assigned integer keys on the given backend.
fn surrogate_key_type(backend: &str) -> &'static str {
    if backend.eq_ignore_ascii_case("PostgreSQL") {
        "SERIAL PRIMARY KEY"
    } else {
        "INTEGER PRIMARY KEY"
    }
}

fn schema_statements(key: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS users (
               id {key},
               name VARCHAR NOT NULL,
               email VARCHAR NOT NULL
             )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS authors (
               id {key},
               name VARCHAR NOT NULL,
               nationality VARCHAR NOT NULL
             )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS books (
               id {key},
               title VARCHAR NOT NULL,
               genre VARCHAR NOT NULL,
               published_year INTEGER NOT NULL,
               author_id INTEGER NOT NULL REFERENCES authors(id)
             )"
        ),
        "CREATE TABLE IF NOT EXISTS reading_list (
           user_id INTEGER NOT NULL REFERENCES users(id),
           book_id INTEGER NOT NULL REFERENCES books(id),
           PRIMARY KEY (user_id, book_id)
         )"
        .to_string(),
    ]
}
