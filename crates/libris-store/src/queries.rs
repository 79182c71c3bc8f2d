//! Read operations for the catalog.
//!
//! Each public read runs in its own session and resolves associations
//! eagerly: nothing handed back to the caller needs another round trip.
//! Integer columns are cast to BIGINT so every backend decodes them as `i64`.

use std::collections::HashMap;
use std::sync::Arc;

use libris_core::{Author, AuthorRecord, Book, BookRecord, User, UserRecord};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};

use crate::client::{StoreClient, StoreError};

const SELECT_AUTHORS: &str = "SELECT CAST(id AS BIGINT) AS id, name, nationality
     FROM authors
     ORDER BY id";

const SELECT_BOOKS: &str = "SELECT CAST(id AS BIGINT) AS id, title, genre,
            CAST(published_year AS BIGINT) AS published_year,
            CAST(author_id AS BIGINT) AS author_id
     FROM books
     ORDER BY id";

const SELECT_USERS: &str = "SELECT CAST(id AS BIGINT) AS id, name, email
     FROM users
     ORDER BY id";

const SELECT_READING_LIST: &str = "SELECT CAST(user_id AS BIGINT) AS user_id,
            CAST(book_id AS BIGINT) AS book_id
     FROM reading_list
     ORDER BY user_id, book_id";

impl StoreClient {
    /// Fetch every book with its author, the author's books, and its readers.
    ///
    /// Books come back in id order. A book whose author row is missing
    /// violates the schema and is reported as a storage failure.
    pub async fn fetch_all_books(&self) -> Result<Vec<BookRecord>, StoreError> {
        let mut session = self.begin_session().await?;

        let authors = load_authors(&mut session).await?;
        let books = load_books(&mut session).await?;
        let users = load_users(&mut session).await?;
        let pairs = load_reading_list(&mut session).await?;

        session.commit().await?;

        let authors = index_author_records(authors, &books);
        let readers = readers_by_book(&users, &pairs);
        let records = attach_associations(books, &authors, &readers)?;

        tracing::debug!(books = records.len(), authors = authors.len(), "Fetched books");
        Ok(records)
    }

    /// Fetch every author with the books it wrote, in author id order.
    pub async fn fetch_all_authors(&self) -> Result<Vec<AuthorRecord>, StoreError> {
        let mut session = self.begin_session().await?;

        let authors = load_authors(&mut session).await?;
        let books = load_books(&mut session).await?;

        session.commit().await?;

        let mut by_author = books_by_author(&books);
        let records: Vec<AuthorRecord> = authors
            .into_iter()
            .map(|author| AuthorRecord {
                books: by_author.remove(&author.id).unwrap_or_default(),
                author,
            })
            .collect();

        tracing::debug!(authors = records.len(), "Fetched authors");
        Ok(records)
    }

    /// Fetch every user with its reading list, in user id order.
    pub async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut session = self.begin_session().await?;

        let users = load_users(&mut session).await?;
        let books = load_books(&mut session).await?;
        let pairs = load_reading_list(&mut session).await?;

        session.commit().await?;

        let books: HashMap<i64, &Book> = books.iter().map(|b| (b.id, b)).collect();
        let mut lists: HashMap<i64, Vec<Book>> = HashMap::new();
        for (user_id, book_id) in &pairs {
            if let Some(book) = books.get(book_id) {
                lists.entry(*user_id).or_default().push((*book).clone());
            }
        }

        let records: Vec<UserRecord> = users
            .into_iter()
            .map(|user| UserRecord {
                reading_list: lists.remove(&user.id).unwrap_or_default(),
                user,
            })
            .collect();

        tracing::debug!(users = records.len(), "Fetched users");
        Ok(records)
    }
}

// ── Row Loading ──────────────────────────────────────────────────

async fn load_authors(conn: &mut AnyConnection) -> Result<Vec<Author>, StoreError> {
    let rows = sqlx::query(SELECT_AUTHORS).fetch_all(&mut *conn).await?;
    rows.iter().map(row_to_author).collect()
}

async fn load_books(conn: &mut AnyConnection) -> Result<Vec<Book>, StoreError> {
    let rows = sqlx::query(SELECT_BOOKS).fetch_all(&mut *conn).await?;
    rows.iter().map(row_to_book).collect()
}

async fn load_users(conn: &mut AnyConnection) -> Result<Vec<User>, StoreError> {
    let rows = sqlx::query(SELECT_USERS).fetch_all(&mut *conn).await?;
    rows.iter().map(row_to_user).collect()
}

async fn load_reading_list(conn: &mut AnyConnection) -> Result<Vec<(i64, i64)>, StoreError> {
    let rows = sqlx::query(SELECT_READING_LIST)
        .fetch_all(&mut *conn)
        .await?;
    rows.iter()
        .map(|row| -> Result<(i64, i64), StoreError> {
            Ok((row.try_get("user_id")?, row.try_get("book_id")?))
        })
        .collect()
}

fn row_to_author(row: &AnyRow) -> Result<Author, StoreError> {
    Ok(Author {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        nationality: row.try_get("nationality")?,
    })
}

fn row_to_book(row: &AnyRow) -> Result<Book, StoreError> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        genre: row.try_get("genre")?,
        published_year: row.try_get("published_year")?,
        author_id: row.try_get("author_id")?,
    })
}

fn row_to_user(row: &AnyRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

// ── Association Resolution ───────────────────────────────────────

/// Group books under their author id, keeping id order within each group.
fn books_by_author(books: &[Book]) -> HashMap<i64, Vec<Book>> {
    let mut grouped: HashMap<i64, Vec<Book>> = HashMap::new();
    for book in books {
        grouped.entry(book.author_id).or_default().push(book.clone());
    }
    grouped
}

/// Build one shared aggregate per author.
fn index_author_records(authors: Vec<Author>, books: &[Book]) -> HashMap<i64, Arc<AuthorRecord>> {
    let mut grouped = books_by_author(books);
    authors
        .into_iter()
        .map(|author| {
            let record = AuthorRecord {
                books: grouped.remove(&author.id).unwrap_or_default(),
                author,
            };
            (record.author.id, Arc::new(record))
        })
        .collect()
}

/// Pair each book with its shared author aggregate and its readers.
fn attach_associations(
    books: Vec<Book>,
    authors: &HashMap<i64, Arc<AuthorRecord>>,
    readers: &HashMap<i64, Vec<User>>,
) -> Result<Vec<BookRecord>, StoreError> {
    let mut records = Vec::with_capacity(books.len());
    for book in books {
        let Some(author) = authors.get(&book.author_id).cloned() else {
            tracing::warn!(
                book_id = book.id,
                author_id = book.author_id,
                "Book references a missing author"
            );
            return Err(StoreError::MissingAuthor {
                book_id: book.id,
                author_id: book.author_id,
            });
        };
        let readers = readers.get(&book.id).cloned().unwrap_or_default();
        records.push(BookRecord {
            book,
            author,
            readers,
        });
    }
    Ok(records)
}

/// Resolve `(user_id, book_id)` pairs into reader lists keyed by book id.
fn readers_by_book(users: &[User], pairs: &[(i64, i64)]) -> HashMap<i64, Vec<User>> {
    let users: HashMap<i64, &User> = users.iter().map(|u| (u.id, u)).collect();
    let mut readers: HashMap<i64, Vec<User>> = HashMap::new();
    for (user_id, book_id) in pairs {
        if let Some(user) = users.get(user_id) {
            readers.entry(*book_id).or_default().push((*user).clone());
        }
    }
    for list in readers.values_mut() {
        list.sort_by_key(|u| u.id);
    }
    readers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, author_id: i64) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            genre: "SciFi".to_string(),
            published_year: 1950 + id,
            author_id,
        }
    }

    fn author(id: i64) -> Author {
        Author {
            id,
            name: format!("Author {id}"),
            nationality: "US".to_string(),
        }
    }

    fn user(id: i64) -> User {
        User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
        }
    }

    #[test]
    fn test_books_grouped_by_author_in_order() {
        let books = vec![book(10, 1), book(11, 2), book(12, 1)];
        let grouped = books_by_author(&books);

        let ids: Vec<i64> = grouped[&1].iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(grouped[&2].len(), 1);
    }

    #[test]
    fn test_author_without_books_gets_empty_list() {
        let records = index_author_records(vec![author(1), author(2)], &[book(10, 1)]);
        assert_eq!(records[&1].books.len(), 1);
        assert!(records[&2].books.is_empty());
    }

    #[test]
    fn test_readers_resolved_and_sorted() {
        let users = vec![user(1), user(2), user(3)];
        let pairs = vec![(3, 10), (1, 10), (2, 11)];
        let readers = readers_by_book(&users, &pairs);

        let ids: Vec<i64> = readers[&10].iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(readers[&11][0].name, "User 2");
        assert!(!readers.contains_key(&12));
    }

    #[test]
    fn test_dangling_reader_pair_ignored() {
        let readers = readers_by_book(&[user(1)], &[(99, 10)]);
        assert!(readers.is_empty());
    }

    #[test]
    fn test_books_share_author_aggregate() {
        let books = vec![book(10, 1), book(11, 1)];
        let authors = index_author_records(vec![author(1)], &books);
        let readers = readers_by_book(&[user(5)], &[(5, 11)]);

        let records = attach_associations(books, &authors, &readers).unwrap();
        assert_eq!(records.len(), 2);
        assert!(Arc::ptr_eq(&records[0].author, &records[1].author));
        assert!(records[0].readers.is_empty());
        assert_eq!(records[1].readers[0].id, 5);
    }

    #[test]
    fn test_missing_author_names_both_ids() {
        let books = vec![book(10, 1), book(20, 99)];
        let authors = index_author_records(vec![author(1)], &books);

        let err = attach_associations(books, &authors, &HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingAuthor {
                book_id: 20,
                author_id: 99
            }
        ));
        let message = err.to_string();
        assert!(message.contains("book 20"));
        assert!(message.contains("author 99"));
    }
}
