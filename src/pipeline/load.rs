//! Document loading: raw text → validated [`SaveDocument`].
//!
//! Loading never mutates the tree. It parses, checks that the bond record
//! and its history are where the client puts them, and hands back the exact
//! value that was parsed.

use crate::config::ConverterConfig;
use crate::document::SaveDocument;
use crate::error::BondError;
use crate::port::TextSource;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Parse and validate a save file.
///
/// # Errors
/// - [`BondError::InvalidJson`] if `text` is not well-formed JSON.
/// - [`BondError::NotAnObject`], [`BondError::MissingTrades`],
///   [`BondError::TradesNotArray`] if the top-level shape is wrong.
/// - [`BondError::RecordNotFound`] / [`BondError::DuplicateRecord`] if
///   `config.target_id` matches zero or several records.
/// - [`BondError::MissingHistory`] / [`BondError::EntriesNotArray`] if the
///   record has no `h.sO` array.
pub fn load(text: &str, config: &ConverterConfig) -> Result<SaveDocument, BondError> {
    let root: Value = serde_json::from_str(text).map_err(BondError::from_json)?;
    load_value(root, config)
}

/// Validate an already-parsed tree.
pub fn load_value(root: Value, config: &ConverterConfig) -> Result<SaveDocument, BondError> {
    let doc = SaveDocument::validate(root, config.target_id)?;
    debug!(
        "Found trade record {} at index {} with {} transactions",
        doc.target_id(),
        doc.record_index(),
        doc.entries().len()
    );
    Ok(doc)
}

/// Read `handle` through `source`, then [`load`] it.
pub fn load_file(
    source: &dyn TextSource,
    handle: &Path,
    config: &ConverterConfig,
) -> Result<SaveDocument, BondError> {
    info!("Importing save file: {}", handle.display());
    let text = source.read_text(handle)?;
    load(&text, config)
}
