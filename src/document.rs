//! The save-file document and read-only views over it.
//!
//! The game client's save file is treated as an opaque JSON tree. Only one
//! path inside it matters:
//!
//! ```text
//! { "trades": [ { "id": 13190, "name": …, "tGL": …, "h": { "sO": [ entry, … ] } }, … ], … }
//! ```
//!
//! [`SaveDocument`] wraps a tree that has already been checked to contain
//! exactly one record with the configured id and an `h.sO` array under it.
//! It can only be produced by [`crate::pipeline::load`] or by the transform,
//! so every function that accepts one can rely on that shape.

use crate::error::{json_type_name, BondError};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::warn;

/// Top-level field holding the trade records.
pub const TRADES_FIELD: &str = "trades";
/// Record field holding its numeric key.
pub const RECORD_ID_FIELD: &str = "id";
/// Record field holding the history object.
pub const HISTORY_FIELD: &str = "h";
/// History field holding the transaction entries.
pub const ENTRIES_FIELD: &str = "sO";
/// Entry field holding the price.
pub const PRICE_FIELD: &str = "p";
/// Entry field holding the status tag.
pub const STATUS_FIELD: &str = "st";
/// Entry field holding the entry's own identifier.
pub const UUID_FIELD: &str = "uuid";
/// Entry field holding the trade start time, in epoch milliseconds.
pub const TRADE_STARTED_AT_FIELD: &str = "tradeStartedAt";
/// Entry field written by the conversion.
pub const CONVERSION_COST_FIELD: &str = "conversionCost";

/// A validated save file.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDocument {
    root: Value,
    target_id: u64,
    record_index: usize,
}

impl SaveDocument {
    /// Validate `root` and wrap it.
    ///
    /// See [`crate::pipeline::load`] for the list of rejected shapes.
    pub(crate) fn validate(root: Value, target_id: u64) -> Result<Self, BondError> {
        let record_index = {
            let trades = trades_of(&root)?;
            let index = match find_records(trades, target_id) {
                RecordMatch::None => return Err(BondError::RecordNotFound { id: target_id }),
                RecordMatch::One(i) => i,
                RecordMatch::Many(indices) => {
                    return Err(BondError::DuplicateRecord {
                        id: target_id,
                        count: indices.len(),
                    })
                }
            };
            entries_of(&trades[index], target_id)?;
            index
        };
        Ok(Self {
            root,
            target_id,
            record_index,
        })
    }

    /// The whole JSON tree.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Unwrap into the JSON tree.
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Id of the record this document was validated against.
    pub fn target_id(&self) -> u64 {
        self.target_id
    }

    /// Position of the target record inside `trades`.
    pub fn record_index(&self) -> usize {
        self.record_index
    }

    /// The target record.
    pub fn record(&self) -> &Value {
        &self.root[TRADES_FIELD][self.record_index]
    }

    /// The target record's `name`, if it has one.
    pub fn record_name(&self) -> Option<&str> {
        self.record().get("name").and_then(Value::as_str)
    }

    /// The target record's transaction entries, in file order.
    pub fn entries(&self) -> &[Value] {
        self.record()[HISTORY_FIELD][ENTRIES_FIELD]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Typed views of [`Self::entries`].
    pub fn transactions(&self) -> Vec<Transaction> {
        self.entries().iter().map(Transaction::from_value).collect()
    }

    /// Mutable access to the entries of the target record.
    ///
    /// Only the transform uses this, on its own copy.
    pub(crate) fn entries_mut(&mut self) -> Result<&mut Vec<Value>, BondError> {
        let id = self.target_id;
        self.root
            .get_mut(TRADES_FIELD)
            .and_then(|t| t.get_mut(self.record_index))
            .and_then(|r| r.get_mut(HISTORY_FIELD))
            .and_then(|h| h.get_mut(ENTRIES_FIELD))
            .and_then(Value::as_array_mut)
            .ok_or(BondError::MissingHistory { id })
    }
}

// ── Record lookup ───────────────────────────────────────────────────────────

/// Result of looking up a record id in `trades`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordMatch {
    None,
    One(usize),
    Many(Vec<usize>),
}

/// Find every record in `trades` whose `id` equals `target_id`.
///
/// Ids written as whole floats (`13190.0`) match as well.
pub fn find_records(trades: &[Value], target_id: u64) -> RecordMatch {
    let mut hits: Vec<usize> = trades
        .iter()
        .enumerate()
        .filter(|(_, trade)| record_id(trade) == Some(target_id))
        .map(|(i, _)| i)
        .collect();
    match hits.len() {
        0 => RecordMatch::None,
        1 => RecordMatch::One(hits.remove(0)),
        _ => RecordMatch::Many(hits),
    }
}

fn record_id(trade: &Value) -> Option<u64> {
    let id = trade.get(RECORD_ID_FIELD)?;
    id.as_u64().or_else(|| {
        id.as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn trades_of(root: &Value) -> Result<&Vec<Value>, BondError> {
    let object = root.as_object().ok_or(BondError::NotAnObject {
        found: json_type_name(root),
    })?;
    let trades = object.get(TRADES_FIELD).ok_or(BondError::MissingTrades)?;
    trades.as_array().ok_or(BondError::TradesNotArray {
        found: json_type_name(trades),
    })
}

fn entries_of(record: &Value, id: u64) -> Result<&Vec<Value>, BondError> {
    let entries = record
        .get(HISTORY_FIELD)
        .and_then(Value::as_object)
        .and_then(|h| h.get(ENTRIES_FIELD))
        .ok_or(BondError::MissingHistory { id })?;
    entries.as_array().ok_or(BondError::EntriesNotArray {
        id,
        found: json_type_name(entries),
    })
}

// ── Typed entry view ───────────────────────────────────────────────────────

/// Status tag of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Bought,
    Sold,
    Other(String),
}

impl TradeStatus {
    /// Classify a raw `st` tag against the configured tags.
    pub fn classify(raw: &str, config: &crate::config::ConverterConfig) -> Self {
        if config.is_bought(raw) {
            TradeStatus::Bought
        } else if config.is_sold(raw) {
            TradeStatus::Sold
        } else {
            TradeStatus::Other(raw.to_string())
        }
    }
}

/// Read-only view of one entry of `h.sO`.
///
/// Every field is optional and read on its own: a field of an unexpected
/// type is blank in the view without hiding the rest of the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub uuid: Option<String>,
    pub id: Option<Number>,
    /// Price as written in the file.
    #[serde(rename = "p")]
    pub price: Option<Number>,
    /// Raw status tag.
    #[serde(rename = "st")]
    pub status: Option<String>,
    /// Epoch milliseconds.
    #[serde(rename = "tradeStartedAt")]
    pub trade_started_at: Option<f64>,
    #[serde(rename = "conversionCost")]
    pub conversion_cost: Option<Number>,
}

impl Transaction {
    /// Build the view field by field. Non-object entries give an empty view.
    pub fn from_value(value: &Value) -> Self {
        let Some(entry) = value.as_object() else {
            warn!(
                "Transaction entry is {}, not an object; showing it blank",
                json_type_name(value)
            );
            return Transaction::default();
        };
        let string = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| match entry.get(key) {
            Some(Value::Number(n)) => Some(n.clone()),
            _ => None,
        };
        Transaction {
            uuid: string(UUID_FIELD),
            id: number(RECORD_ID_FIELD),
            price: number(PRICE_FIELD),
            status: string(STATUS_FIELD),
            trade_started_at: entry.get(TRADE_STARTED_AT_FIELD).and_then(Value::as_f64),
            conversion_cost: number(CONVERSION_COST_FIELD),
        }
    }

    /// Price as a float, when present.
    pub fn price_f64(&self) -> Option<f64> {
        self.price.as_ref().and_then(Number::as_f64)
    }

    /// Conversion cost as a float, when present.
    pub fn conversion_cost_f64(&self) -> Option<f64> {
        self.conversion_cost.as_ref().and_then(Number::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "lastStoreId": 7,
            "trades": [
                { "id": 995, "name": "Coins", "h": { "sO": [] } },
                { "id": 13190, "name": "Old school bond", "tGL": 0, "h": { "sO": [
                    { "uuid": "a", "id": 1, "p": 1000, "st": "BOUGHT", "tradeStartedAt": 1672876800000u64 }
                ] } }
            ]
        })
    }

    #[test]
    fn validate_finds_target_record() {
        let d = SaveDocument::validate(doc(), 13190).unwrap();
        assert_eq!(d.record_index(), 1);
        assert_eq!(d.record_name(), Some("Old school bond"));
        assert_eq!(d.entries().len(), 1);
        assert_eq!(d.target_id(), 13190);
    }

    #[test]
    fn find_records_reports_zero_one_many() {
        let trades = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 1.0})];
        assert_eq!(find_records(&trades, 3), RecordMatch::None);
        assert_eq!(find_records(&trades, 2), RecordMatch::One(1));
        assert_eq!(find_records(&trades, 1), RecordMatch::Many(vec![0, 2]));
    }

    #[test]
    fn string_id_does_not_match() {
        let trades = vec![json!({"id": "13190"})];
        assert_eq!(find_records(&trades, 13190), RecordMatch::None);
    }

    #[test]
    fn validate_rejects_history_without_entries() {
        let root = json!({"trades": [{"id": 13190, "h": {}}]});
        let err = SaveDocument::validate(root, 13190).unwrap_err();
        assert!(matches!(err, BondError::MissingHistory { id: 13190 }));
    }

    #[test]
    fn transaction_view_reads_entry_fields() {
        let d = SaveDocument::validate(doc(), 13190).unwrap();
        let t = &d.transactions()[0];
        assert_eq!(t.uuid.as_deref(), Some("a"));
        assert_eq!(t.price_f64(), Some(1000.0));
        assert_eq!(t.status.as_deref(), Some("BOUGHT"));
        assert_eq!(t.trade_started_at, Some(1672876800000.0));
        assert!(t.conversion_cost.is_none());
    }

    #[test]
    fn malformed_entry_becomes_blank_view() {
        let t = Transaction::from_value(&json!("not an entry"));
        assert_eq!(t, Transaction::default());
    }

    #[test]
    fn odd_field_types_only_blank_that_field() {
        let t = Transaction::from_value(&json!({
            "uuid": 7, "id": -1, "p": 1000, "st": "BOUGHT",
            "tradeStartedAt": "yesterday", "conversionCost": 100
        }));
        assert_eq!(t.uuid, None);
        assert_eq!(t.id.as_ref().and_then(Number::as_i64), Some(-1));
        assert_eq!(t.price_f64(), Some(1000.0));
        assert_eq!(t.status.as_deref(), Some("BOUGHT"));
        assert_eq!(t.trade_started_at, None);
        assert_eq!(t.conversion_cost_f64(), Some(100.0));
    }

    #[test]
    fn status_classification() {
        let c = crate::config::ConverterConfig::default();
        assert_eq!(TradeStatus::classify("BOUGHT", &c), TradeStatus::Bought);
        assert_eq!(TradeStatus::classify("Sold", &c), TradeStatus::Sold);
        assert_eq!(
            TradeStatus::classify("CANCELLED", &c),
            TradeStatus::Other("CANCELLED".into())
        );
    }
}
