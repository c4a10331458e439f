//! Result types produced by the pipeline and the session.

use crate::config::ConverterConfig;
use crate::document::{SaveDocument, TradeStatus, Transaction};
use crate::pipeline::format;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Counts of the target record's transactions by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub bought: usize,
    pub sold: usize,
    /// Entries with any other (or no) status tag.
    pub other: usize,
    pub total: usize,
}

impl TradeSummary {
    /// Tally the entries of `doc`.
    pub fn of(doc: &SaveDocument, config: &ConverterConfig) -> Self {
        let mut summary = TradeSummary::default();
        for t in doc.transactions() {
            summary.total += 1;
            match t.status.as_deref().map(|s| TradeStatus::classify(s, config)) {
                Some(TradeStatus::Bought) => summary.bought += 1,
                Some(TradeStatus::Sold) => summary.sold += 1,
                _ => summary.other += 1,
            }
        }
        summary
    }
}

/// Statistics of one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Entries in the target record.
    pub total_entries: usize,
    /// Purchases whose conversion cost was written.
    pub converted_entries: usize,
    /// Entries copied through untouched.
    pub passed_through: usize,
}

/// One line of the transaction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub uuid: Option<String>,
    /// Formatted `tradeStartedAt`.
    pub date: String,
    /// Price as written in the file, blank when missing.
    pub price: String,
    /// Conversion cost, `None` when absent or zero.
    pub conversion_cost: Option<String>,
}

impl TransactionRow {
    /// Build a row from a transaction view.
    pub fn from_transaction(t: &Transaction, config: &ConverterConfig) -> Self {
        let date = match t.trade_started_at {
            Some(ms) => format::format_timestamp(ms, config.date_format, config.time_zone),
            None => format::INVALID_DATE.to_string(),
        };
        let conversion_cost = t
            .conversion_cost
            .as_ref()
            .filter(|n| n.as_f64().is_some_and(|f| f != 0.0))
            .map(ToString::to_string);
        Self {
            uuid: t.uuid.clone(),
            date,
            price: t.price.as_ref().map(ToString::to_string).unwrap_or_default(),
            conversion_cost,
        }
    }

    /// Cost column text: the value, or `N/A`.
    pub fn conversion_cost_label(&self) -> &str {
        self.conversion_cost.as_deref().unwrap_or("N/A")
    }

    /// Rows for every entry of `doc`, in file order.
    pub fn all(doc: &SaveDocument, config: &ConverterConfig) -> Vec<Self> {
        doc.transactions()
            .iter()
            .map(|t| Self::from_transaction(t, config))
            .collect()
    }
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReceipt {
    /// Name the document was offered under (the imported file name).
    pub file_name: String,
    /// Location reported by the sink.
    pub location: PathBuf,
    /// Size of the serialized text.
    pub bytes: usize,
}
