//! Graph materialization: relational records to finite response trees.
//!
//! The catalog is cyclic (Book -> Author -> Books -> Author -> ...). Views
//! unfold it exactly two hops from the root and put the empty sentinel
//! author where expansion stops. There is no visited set and no sharing:
//! the same author is rebuilt for every book that references it.

use libris_core::{AuthorRecord, AuthorView, Book, BookRecord, BookView, UserRecord, UserView};

/// Render a book.
///
/// With `include_author_books`, the author is rendered with its full book
/// list, each sibling truncated (sentinel author). Without it, the author
/// itself is the sentinel.
pub fn to_book_view(record: &BookRecord, include_author_books: bool) -> BookView {
    let author = if include_author_books {
        to_author_view(&record.author, true)
    } else {
        AuthorView::sentinel()
    };
    book_view(&record.book, author)
}

/// Render an author.
///
/// With `include_books`, every book it wrote is nested one level below,
/// truncated. Without it, `books` is empty (never absent).
pub fn to_author_view(record: &AuthorRecord, include_books: bool) -> AuthorView {
    let books = if include_books {
        record.books.iter().map(truncated_book_view).collect()
    } else {
        Vec::new()
    };
    AuthorView {
        id: record.author.id,
        name: record.author.name.clone(),
        nationality: record.author.nationality.clone(),
        books,
    }
}

/// Render a user. Reading-list books are truncated like any nested book.
pub fn to_user_view(record: &UserRecord, include_reading_list: bool) -> UserView {
    let reading_list = if include_reading_list {
        record.reading_list.iter().map(truncated_book_view).collect()
    } else {
        Vec::new()
    };
    UserView {
        id: record.user.id,
        name: record.user.name.clone(),
        email: record.user.email.clone(),
        reading_list,
    }
}

/// A book one level below the root: its author is the sentinel.
fn truncated_book_view(book: &Book) -> BookView {
    book_view(book, AuthorView::sentinel())
}

fn book_view(book: &Book, author: AuthorView) -> BookView {
    BookView {
        id: book.id,
        title: book.title.clone(),
        genre: book.genre.clone(),
        published_year: book.published_year,
        author,
    }
}
