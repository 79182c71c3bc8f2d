//! Core domain types for the Libris catalog.
//!
//! Two families live here:
//! - persisted entities (`User`, `Author`, `Book`) and the resolved records the
//!   storage gateway assembles from them;
//! - response views (`BookView`, `AuthorView`, `UserView`), the finite trees
//!   handed to callers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ── Persisted Entities ───────────────────────────────────────────

/// A library member. Row of `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A book author. Row of `authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub nationality: String,
}

/// A catalogued book. Row of `books`; `author_id` is never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub published_year: i64,
    pub author_id: i64,
}

// ── Resolved Records ─────────────────────────────────────────────

/// An author together with every book it wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub author: Author,
    pub books: Vec<Book>,
}

/// A book with its associations eagerly resolved.
///
/// `author` carries the author's own book list, one hop further than the
/// book itself. Records of sibling books point at the same aggregate; it is
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub book: Book,
    pub author: Arc<AuthorRecord>,
    pub readers: Vec<User>,
}

/// A user with the books on its reading list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user: User,
    pub reading_list: Vec<Book>,
}

// ── Response Views ───────────────────────────────────────────────

/// Public projection of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub published_year: i64,
    pub author: AuthorView,
}

/// Public projection of an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: i64,
    pub name: String,
    pub nationality: String,
    pub books: Vec<BookView>,
}

impl AuthorView {
    /// The placeholder rendered where expansion stops: `{0, "", "", []}`.
    ///
    /// Indistinguishable from a stored author whose id is 0.
    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub reading_list: Vec<BookView>,
}
