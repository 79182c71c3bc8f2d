//! libris-query: Read queries over the Libris catalog.
//!
//! Fetches resolved records through the storage gateway, materializes them
//! into finite response trees (fixed two-hop unfold with an empty sentinel
//! at the cutoff), and serves the results over HTTP or the `libris` CLI.

pub mod error;
pub mod http;
pub mod materialize;
pub mod service;

pub use error::QueryError;
pub use service::CatalogService;

use std::io::Write;

use serde::Serialize;

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut out: W, value: &T) -> error::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
