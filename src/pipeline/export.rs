//! Serialization and export of a document.

use crate::document::SaveDocument;
use crate::error::BondError;
use crate::output::ExportReceipt;
use crate::port::TextSink;
use tracing::info;

/// Serialize `doc` as 2-space indented JSON, keys in their original order.
pub fn serialize(doc: &SaveDocument) -> Result<String, BondError> {
    serde_json::to_string_pretty(doc.as_value())
        .map_err(|e| BondError::Internal(format!("serialising document: {e}")))
}

/// Serialize `doc` and hand it to `sink` under `file_name`.
pub fn export(
    doc: &SaveDocument,
    file_name: &str,
    sink: &dyn TextSink,
) -> Result<ExportReceipt, BondError> {
    let text = serialize(doc)?;
    let location = sink.write_text(file_name, &text)?;
    info!("Exported {} bytes to {}", text.len(), location.display());
    Ok(ExportReceipt {
        file_name: file_name.to_string(),
        location,
        bytes: text.len(),
    })
}
