//! The conversion-cost transform.
//!
//! For every purchase in the bond record's history, write
//! `conversionCost = p × rate`. Nothing else in the document changes: sales
//! and unknown statuses keep whatever `conversionCost` they had (usually
//! none), other records and top-level fields are copied through, and entry
//! order is preserved.
//!
//! The transform borrows its input and returns a fresh document, so the
//! caller's copy is never touched and a failed run leaves nothing half
//! written. Running it again recomputes every purchase from its current
//! price, so repeated runs converge on the same output.

use crate::config::ConverterConfig;
use crate::document::{
    SaveDocument, CONVERSION_COST_FIELD, PRICE_FIELD, STATUS_FIELD, UUID_FIELD,
};
use crate::error::BondError;
use crate::output::ConversionStats;
use serde_json::{Number, Value};
use tracing::{debug, info};

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Apply the conversion cost to every purchase of the target record.
///
/// # Errors
/// [`BondError::InvalidPrice`] if a purchase has no numeric `p`, or if the
/// product overflows to a non-finite value.
pub fn apply_conversion_cost(
    doc: &SaveDocument,
    config: &ConverterConfig,
) -> Result<(SaveDocument, ConversionStats), BondError> {
    let rate = config.conversion_rate;
    let mut out = doc.clone();
    let entries = out.entries_mut()?;

    let mut stats = ConversionStats {
        total_entries: entries.len(),
        ..ConversionStats::default()
    };

    for (index, entry) in entries.iter_mut().enumerate() {
        let Some(fields) = entry.as_object_mut() else {
            stats.passed_through += 1;
            continue;
        };

        let is_purchase = fields
            .get(STATUS_FIELD)
            .and_then(Value::as_str)
            .is_some_and(|st| config.is_bought(st));
        if !is_purchase {
            stats.passed_through += 1;
            continue;
        }

        let cost = fields
            .get(PRICE_FIELD)
            .and_then(Value::as_f64)
            .and_then(|price| cost_number(price * rate))
            .ok_or_else(|| BondError::InvalidPrice {
                index,
                uuid: fields
                    .get(UUID_FIELD)
                    .and_then(Value::as_str)
                    .unwrap_or("<no uuid>")
                    .to_string(),
            })?;

        debug!("Transaction #{index}: conversion cost {cost}");
        fields.insert(CONVERSION_COST_FIELD.to_string(), Value::Number(cost));
        stats.converted_entries += 1;
    }

    info!(
        "Conversion cost applied to {}/{} transactions (rate {})",
        stats.converted_entries, stats.total_entries, rate
    );
    Ok((out, stats))
}

/// JSON number for a computed cost.
///
/// Whole results are stored as integers, the way the client writes them.
fn cost_number(cost: f64) -> Option<Number> {
    if !cost.is_finite() {
        return None;
    }
    if cost.fract() == 0.0 && cost.abs() <= MAX_SAFE_INTEGER {
        return Some(Number::from(cost as i64));
    }
    Number::from_f64(cost)
}
