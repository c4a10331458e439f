//! # bond-converter
//!
//! Apply the Old School bond conversion cost to a trade-tracker save file.
//!
//! The game client's trade tracker exports its state as one JSON document.
//! Inside it, the trade record for item **13190** ("Old school bond") keeps a
//! history of purchases and sales under `h.sO`. Converting a tradeable bond
//! into a membership bond costs 10 % of its price, and this crate writes that
//! cost onto every purchase so the tracker reports real profits.
//!
//! ## Pipeline Overview
//!
//! ```text
//! save.json
//!  │
//!  ├─ 1. Load       parse JSON, check trades[id=13190].h.sO exists exactly once
//!  ├─ 2. Transform  conversionCost = p × 0.10 on every BOUGHT entry
//!  ├─ 3. Display    summary + Date / Price / Conversion Cost table
//!  └─ 4. Export     2-space JSON, same file name, every other field untouched
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bond_converter::{ConverterConfig, Session};
//!
//! let save = r#"{"trades": [{"id": 13190, "name": "Old school bond", "h": {"sO": [
//!     {"uuid": "a", "id": 1, "p": 1000, "st": "BOUGHT", "tradeStartedAt": 1672876800000}
//! ]}}]}"#;
//!
//! let mut session = Session::new(ConverterConfig::default());
//! session.import_text("save.json", save)?;
//! session.convert()?;
//! let json = session.export_text()?;
//! assert!(json.contains("\"conversionCost\": 100"));
//! # Ok::<(), bond_converter::BondError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bondconv` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod port;
pub mod report;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConverterConfig, ConverterConfigBuilder, DateFormat, TimeZoneMode, BOND_ITEM_ID,
    DEFAULT_CONVERSION_RATE,
};
pub use document::{find_records, RecordMatch, SaveDocument, TradeStatus, Transaction};
pub use error::{BondError, ErrorKind};
pub use observer::{NoopObserver, Observer, SessionObserver};
pub use output::{ConversionStats, ExportReceipt, TradeSummary, TransactionRow};
pub use pipeline::export::{export, serialize};
pub use pipeline::format::{format_date, format_timestamp, INVALID_DATE};
pub use pipeline::load::{load, load_file, load_value};
pub use pipeline::transform::apply_conversion_cost;
pub use port::{DirSink, FsSource, TextSink, TextSource};
pub use report::{render_summary, render_table};
pub use session::{Session, SessionState};
