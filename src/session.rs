//! The converter session: one explicit state object for the whole workflow.
//!
//! ```text
//!            import ok                convert
//!   Empty ─────────────▶ Loaded ─────────────▶ Converted ─┐
//!     ▲                    ▲  import ok          │  ▲      │ convert
//!     │                    └─────────────────────┘  └──────┘
//!   (start)
//! ```
//!
//! * `import` from any state replaces the document; a failed import leaves
//!   the current state exactly as it was.
//! * `convert` needs a document (`NothingImported` otherwise).
//! * `export` needs a converted document (`NotConverted` otherwise) and never
//!   changes state.
//!
//! Every outcome is reported to the configured
//! [`crate::observer::SessionObserver`].

use crate::config::ConverterConfig;
use crate::document::SaveDocument;
use crate::error::BondError;
use crate::output::{ConversionStats, ExportReceipt, TradeSummary, TransactionRow};
use crate::pipeline::{export, load, transform};
use crate::port::{file_name_of, TextSink, TextSource};
use std::path::Path;
use tracing::{debug, warn};

/// Where the session is in the import → convert → export workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Nothing imported yet.
    #[default]
    Empty,
    /// A validated save file, not yet converted.
    Loaded {
        file_name: String,
        document: SaveDocument,
    },
    /// The conversion cost has been applied at least once.
    Converted {
        file_name: String,
        document: SaveDocument,
        stats: ConversionStats,
    },
}

impl SessionState {
    /// Short name of the state, for logs.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loaded { .. } => "loaded",
            SessionState::Converted { .. } => "converted",
        }
    }
}

/// Drives import, conversion, and export for one user.
#[derive(Debug, Default)]
pub struct Session {
    config: ConverterConfig,
    state: SessionState,
}

impl Session {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            state: SessionState::Empty,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Read `handle` through `source` and import it under its file name.
    pub fn import(
        &mut self,
        source: &dyn TextSource,
        handle: &Path,
    ) -> Result<TradeSummary, BondError> {
        let result = file_name_of(handle).and_then(|name| {
            load::load_file(source, handle, &self.config).map(|doc| (name, doc))
        });
        self.finish_import(result)
    }

    /// Import already-read text.
    pub fn import_text(
        &mut self,
        file_name: impl Into<String>,
        text: &str,
    ) -> Result<TradeSummary, BondError> {
        let result = load::load(text, &self.config).map(|doc| (file_name.into(), doc));
        self.finish_import(result)
    }

    fn finish_import(
        &mut self,
        result: Result<(String, SaveDocument), BondError>,
    ) -> Result<TradeSummary, BondError> {
        let (file_name, document) = self.report(result)?;
        let summary = TradeSummary::of(&document, &self.config);
        if let Some(ref obs) = self.config.observer {
            obs.on_imported(&file_name, &summary);
        }
        self.transition(SessionState::Loaded {
            file_name,
            document,
        });
        Ok(summary)
    }

    /// Apply the conversion cost to the current document.
    pub fn convert(&mut self) -> Result<ConversionStats, BondError> {
        let result = match &self.state {
            SessionState::Empty => Err(BondError::NothingImported),
            SessionState::Loaded {
                file_name,
                document,
            }
            | SessionState::Converted {
                file_name,
                document,
                ..
            } => transform::apply_conversion_cost(document, &self.config)
                .map(|(document, stats)| (file_name.clone(), document, stats)),
        };
        let (file_name, document, stats) = self.report(result)?;
        if let Some(ref obs) = self.config.observer {
            obs.on_converted(&stats);
        }
        self.transition(SessionState::Converted {
            file_name,
            document,
            stats,
        });
        Ok(stats)
    }

    /// Write the converted document through `sink` under the imported name.
    pub fn export(&self, sink: &dyn TextSink) -> Result<ExportReceipt, BondError> {
        let result = match &self.state {
            SessionState::Converted {
                file_name,
                document,
                ..
            } => export::export(document, file_name, sink),
            _ => Err(BondError::NotConverted),
        };
        let receipt = self.report(result)?;
        if let Some(ref obs) = self.config.observer {
            obs.on_exported(&receipt);
        }
        Ok(receipt)
    }

    /// The converted document as export text, without writing it anywhere.
    pub fn export_text(&self) -> Result<String, BondError> {
        let result = match &self.state {
            SessionState::Converted { document, .. } => export::serialize(document),
            _ => Err(BondError::NotConverted),
        };
        self.report(result)
    }

    /// The current document, if any.
    pub fn document(&self) -> Option<&SaveDocument> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Loaded { document, .. } | SessionState::Converted { document, .. } => {
                Some(document)
            }
        }
    }

    /// Name the current document was imported under.
    pub fn file_name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Loaded { file_name, .. } | SessionState::Converted { file_name, .. } => {
                Some(file_name)
            }
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self.state, SessionState::Converted { .. })
    }

    /// Quantity bought / sold in the current document.
    pub fn summary(&self) -> Option<TradeSummary> {
        self.document()
            .map(|doc| TradeSummary::of(doc, &self.config))
    }

    /// Table rows for the current document.
    pub fn rows(&self) -> Option<Vec<TransactionRow>> {
        self.document()
            .map(|doc| TransactionRow::all(doc, &self.config))
    }

    /// Change the date pattern used by [`Self::rows`].
    pub fn set_date_format(&mut self, format: crate::config::DateFormat) {
        self.config.date_format = format;
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {} → {}", self.state.label(), next.label());
        self.state = next;
    }

    fn report<T>(&self, result: Result<T, BondError>) -> Result<T, BondError> {
        if let Err(ref e) = result {
            warn!("{e}");
            if let Some(ref obs) = self.config.observer {
                obs.on_error(e);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::observer::SessionObserver;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    const SAVE: &str = r#"{"trades": [{"id": 13190, "name": "Old school bond", "h": {"sO": [
        {"uuid": "a", "p": 1000, "st": "BOUGHT", "tradeStartedAt": 1672876800000},
        {"uuid": "b", "p": 500, "st": "SOLD", "tradeStartedAt": 1672876800000}
    ]}}]}"#;

    #[derive(Default)]
    struct Sink {
        files: RefCell<Vec<(String, String)>>,
    }

    impl TextSink for Sink {
        fn write_text(&self, name: &str, text: &str) -> Result<PathBuf, BondError> {
            self.files
                .borrow_mut()
                .push((name.to_string(), text.to_string()));
            Ok(PathBuf::from(name))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SessionObserver for Recorder {
        fn on_imported(&self, file_name: &str, summary: &TradeSummary) {
            self.events
                .lock()
                .unwrap()
                .push(format!("imported {file_name} {}/{}", summary.bought, summary.sold));
        }
        fn on_converted(&self, stats: &ConversionStats) {
            self.events
                .lock()
                .unwrap()
                .push(format!("converted {}", stats.converted_entries));
        }
        fn on_exported(&self, receipt: &ExportReceipt) {
            self.events
                .lock()
                .unwrap()
                .push(format!("exported {}", receipt.file_name));
        }
        fn on_error(&self, error: &BondError) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error {}", error.user_message()));
        }
    }

    #[test]
    fn happy_path_walks_all_states() {
        let mut s = Session::default();
        assert_eq!(s.state(), &SessionState::Empty);

        let summary = s.import_text("save.json", SAVE).unwrap();
        assert_eq!((summary.bought, summary.sold), (1, 1));
        assert_eq!(s.state().label(), "loaded");
        assert!(!s.is_converted());

        let stats = s.convert().unwrap();
        assert_eq!(stats.converted_entries, 1);
        assert!(s.is_converted());

        let sink = Sink::default();
        let receipt = s.export(&sink).unwrap();
        assert_eq!(receipt.file_name, "save.json");
        assert_eq!(sink.files.borrow()[0].0, "save.json");
        assert!(s.is_converted(), "export does not change state");
    }

    #[test]
    fn convert_before_import_is_a_precondition_error() {
        let mut s = Session::default();
        let err = s.convert().unwrap_err();
        assert!(matches!(err, BondError::NothingImported));
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(s.state(), &SessionState::Empty);
    }

    #[test]
    fn export_before_convert_is_a_precondition_error() {
        let mut s = Session::default();
        let sink = Sink::default();
        assert!(matches!(s.export(&sink), Err(BondError::NotConverted)));

        s.import_text("save.json", SAVE).unwrap();
        assert!(matches!(s.export(&sink), Err(BondError::NotConverted)));
        assert!(matches!(s.export_text(), Err(BondError::NotConverted)));
        assert!(sink.files.borrow().is_empty());
    }

    #[test]
    fn failed_import_keeps_previous_state() {
        let mut s = Session::default();
        s.import_text("good.json", SAVE).unwrap();
        s.convert().unwrap();
        let before = s.state().clone();

        let err = s.import_text("bad.json", r#"{"trades": []}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(s.state(), &before);
        assert_eq!(s.file_name(), Some("good.json"));

        let err = s.import_text("worse.json", "not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn failed_convert_keeps_previous_state() {
        let bad = r#"{"trades": [{"id": 13190, "h": {"sO": [
            {"uuid": "a", "p": 1000, "st": "BOUGHT"},
            {"uuid": "b", "p": "lots", "st": "BOUGHT"}
        ]}}]}"#;
        let mut s = Session::default();
        s.import_text("bad.json", bad).unwrap();

        let err = s.convert().unwrap_err();
        assert!(matches!(err, BondError::InvalidPrice { index: 1, .. }));
        assert_eq!(s.state().label(), "loaded");

        // Same document, but already marked converted by an earlier run.
        let document = s.document().cloned().unwrap();
        let stats = ConversionStats {
            total_entries: 2,
            converted_entries: 2,
            passed_through: 0,
        };
        s.transition(SessionState::Converted {
            file_name: "bad.json".into(),
            document,
            stats,
        });
        let before = s.state().clone();

        let err = s.convert().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(s.state(), &before);
        assert!(matches!(
            s.state(),
            SessionState::Converted { stats: kept, .. } if *kept == stats
        ));
    }

    #[test]
    fn new_import_resets_converted_flag() {
        let mut s = Session::default();
        s.import_text("a.json", SAVE).unwrap();
        s.convert().unwrap();
        s.import_text("b.json", SAVE).unwrap();
        assert!(!s.is_converted());
        assert_eq!(s.file_name(), Some("b.json"));
    }

    #[test]
    fn convert_twice_is_stable() {
        let mut s = Session::default();
        s.import_text("a.json", SAVE).unwrap();
        s.convert().unwrap();
        let first = s.export_text().unwrap();
        s.convert().unwrap();
        assert_eq!(s.export_text().unwrap(), first);
    }

    #[test]
    fn rows_follow_date_format() {
        let mut s = Session::default();
        assert!(s.rows().is_none());
        s.import_text("a.json", SAVE).unwrap();
        assert_eq!(s.rows().unwrap()[0].date, "01/05/2023");
        s.set_date_format(crate::config::DateFormat::DayFirst);
        assert_eq!(s.rows().unwrap()[0].date, "05/01/2023");
    }

    #[test]
    fn observer_sees_every_outcome() {
        let recorder = Arc::new(Recorder::default());
        let config = ConverterConfig::builder()
            .observer(recorder.clone())
            .build()
            .unwrap();
        let mut s = Session::new(config);
        let sink = Sink::default();

        let _ = s.convert();
        s.import_text("save.json", SAVE).unwrap();
        s.convert().unwrap();
        s.export(&sink).unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "error Please choose a file first.".to_string(),
                "imported save.json 1/1".to_string(),
                "converted 1".to_string(),
                "exported save.json".to_string(),
            ]
        );
    }
}
