//! Observer trait for session events.
//!
//! Inject an [`Arc<dyn SessionObserver>`] via
//! [`crate::config::ConverterConfigBuilder::observer`] to be told about every
//! import, conversion, and export, successful or not. This is the
//! notification surface of the host: a terminal printer, a snackbar, a log.
//!
//! # Example
//!
//! ```rust
//! use bond_converter::{ConverterConfig, SessionObserver, TradeSummary};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     imports: AtomicUsize,
//! }
//!
//! impl SessionObserver for CountingObserver {
//!     fn on_imported(&self, file_name: &str, summary: &TradeSummary) {
//!         self.imports.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file_name}: {} bought / {} sold", summary.bought, summary.sold);
//!     }
//! }
//!
//! let observer = Arc::new(CountingObserver { imports: AtomicUsize::new(0) });
//! let config = ConverterConfig::builder()
//!     .observer(observer as Arc<dyn SessionObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::BondError;
use crate::output::{ConversionStats, ExportReceipt, TradeSummary};
use std::sync::Arc;

/// Called by [`crate::session::Session`] after each user action.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about.
pub trait SessionObserver: Send + Sync {
    /// A save file was imported and validated.
    fn on_imported(&self, file_name: &str, summary: &TradeSummary) {
        let _ = (file_name, summary);
    }

    /// The conversion cost was (re)applied.
    fn on_converted(&self, stats: &ConversionStats) {
        let _ = stats;
    }

    /// The converted document was written.
    fn on_exported(&self, receipt: &ExportReceipt) {
        let _ = receipt;
    }

    /// An action failed. The session state is unchanged.
    fn on_error(&self, error: &BondError) {
        let _ = error;
    }
}

/// Type alias used in [`crate::config::ConverterConfig`].
pub type Observer = Arc<dyn SessionObserver>;

/// A no-op observer for hosts that only inspect return values.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        errors: AtomicUsize,
    }

    impl SessionObserver for Counter {
        fn on_error(&self, _error: &BondError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_methods_are_noops() {
        let obs = NoopObserver;
        obs.on_imported("a.json", &TradeSummary::default());
        obs.on_converted(&ConversionStats::default());
        obs.on_error(&BondError::NotConverted);
    }

    #[test]
    fn overridden_method_is_called() {
        let counter = Arc::new(Counter {
            errors: AtomicUsize::new(0),
        });
        let obs: Observer = counter.clone();
        obs.on_error(&BondError::NothingImported);
        obs.on_converted(&ConversionStats::default());
        assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
    }
}
