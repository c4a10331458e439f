//! Configuration for the bond converter.
//!
//! Everything the pipeline needs to know about the save-file layout it is
//! looking for (which record, which status tag, which rate) and how dates
//! should be shown lives in [`ConverterConfig`], built via its
//! [`ConverterConfigBuilder`]. The defaults describe the Old School bond
//! record exactly as the game client writes it.

use crate::error::BondError;
use crate::observer::Observer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item id of the "Old school bond" trade record.
pub const BOND_ITEM_ID: u64 = 13190;

/// Fraction of the purchase price charged to convert a bond.
pub const DEFAULT_CONVERSION_RATE: f64 = 0.10;

/// Configuration for loading, converting, and displaying a save file.
///
/// # Example
/// ```rust
/// use bond_converter::{ConverterConfig, DateFormat};
///
/// let config = ConverterConfig::builder()
///     .date_format(DateFormat::DayFirst)
///     .build()
///     .unwrap();
/// assert_eq!(config.target_id, 13190);
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// Id of the trade record to convert. Default: 13190.
    pub target_id: u64,

    /// Multiplier applied to the price of each purchase. Default: 0.10.
    pub conversion_rate: f64,

    /// Status tag marking a purchase. Default: `"BOUGHT"`.
    ///
    /// Compared ASCII-case-insensitively.
    pub bought_status: String,

    /// Status tag marking a sale. Default: `"SOLD"`. Only used for the summary.
    pub sold_status: String,

    /// Date pattern for the transaction table. Default: month first.
    pub date_format: DateFormat,

    /// Clock the timestamps are rendered in. Default: UTC.
    pub time_zone: TimeZoneMode,

    /// Receives import / convert / export notifications.
    pub observer: Option<Observer>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            target_id: BOND_ITEM_ID,
            conversion_rate: DEFAULT_CONVERSION_RATE,
            bought_status: "BOUGHT".to_string(),
            sold_status: "SOLD".to_string(),
            date_format: DateFormat::default(),
            time_zone: TimeZoneMode::default(),
            observer: None,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("target_id", &self.target_id)
            .field("conversion_rate", &self.conversion_rate)
            .field("bought_status", &self.bought_status)
            .field("sold_status", &self.sold_status)
            .field("date_format", &self.date_format)
            .field("time_zone", &self.time_zone)
            .field("observer", &self.observer.as_ref().map(|_| "<dyn SessionObserver>"))
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether `status` is the purchase tag.
    pub fn is_bought(&self, status: &str) -> bool {
        status.eq_ignore_ascii_case(&self.bought_status)
    }

    /// Whether `status` is the sale tag.
    pub fn is_sold(&self, status: &str) -> bool {
        status.eq_ignore_ascii_case(&self.sold_status)
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn target_id(mut self, id: u64) -> Self {
        self.config.target_id = id;
        self
    }

    pub fn conversion_rate(mut self, rate: f64) -> Self {
        self.config.conversion_rate = rate;
        self
    }

    pub fn bought_status(mut self, tag: impl Into<String>) -> Self {
        self.config.bought_status = tag.into();
        self
    }

    pub fn sold_status(mut self, tag: impl Into<String>) -> Self {
        self.config.sold_status = tag.into();
        self
    }

    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    pub fn time_zone(mut self, zone: TimeZoneMode) -> Self {
        self.config.time_zone = zone;
        self
    }

    pub fn observer(mut self, observer: Observer) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, BondError> {
        let c = &self.config;
        if !c.conversion_rate.is_finite() || !(0.0..=1.0).contains(&c.conversion_rate) {
            return Err(BondError::InvalidConfig(format!(
                "conversion rate must be within 0.0–1.0, got {}",
                c.conversion_rate
            )));
        }
        if c.bought_status.trim().is_empty() {
            return Err(BondError::InvalidConfig(
                "bought status tag must not be empty".into(),
            ));
        }
        if c.bought_status.eq_ignore_ascii_case(&c.sold_status) {
            return Err(BondError::InvalidConfig(format!(
                "bought and sold status tags must differ, both are '{}'",
                c.bought_status
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Display pattern for transaction dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    /// `MM/DD/YYYY` (default).
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY`.
    DayFirst,
}

impl DateFormat {
    /// The pattern as shown in the format selector.
    pub fn label(self) -> &'static str {
        match self {
            DateFormat::MonthFirst => "MM/DD/YYYY",
            DateFormat::DayFirst => "DD/MM/YYYY",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateFormat {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm/dd/yyyy" | "month-first" | "mdy" => Ok(DateFormat::MonthFirst),
            "dd/mm/yyyy" | "day-first" | "dmy" => Ok(DateFormat::DayFirst),
            other => Err(BondError::InvalidConfig(format!(
                "unknown date format '{other}' (expected MM/DD/YYYY or DD/MM/YYYY)"
            ))),
        }
    }
}

/// Which clock epoch timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeZoneMode {
    /// Coordinated Universal Time. Deterministic across machines. (default)
    #[default]
    Utc,
    /// The machine's local time zone.
    Local,
}
