//! CLI binary for bond-converter.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConverterConfig`, drives one `Session`, and prints results.

use anyhow::{Context, Result};
use bond_converter::{
    render_summary, render_table, BondError, ConversionStats, ConverterConfig, DateFormat,
    DirSink, ExportReceipt, FsSource, Session, SessionObserver, TimeZoneMode, TradeSummary,
    TransactionRow, BOND_ITEM_ID, DEFAULT_CONVERSION_RATE,
};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal notifications ───────────────────────────────────────────────────

/// Prints one status line per session event on stderr.
struct CliObserver;

impl SessionObserver for CliObserver {
    fn on_imported(&self, file_name: &str, summary: &TradeSummary) {
        eprintln!(
            "{} File successfully imported: {}  {}",
            green("✔"),
            bold(file_name),
            dim(&format!(
                "({} bought / {} sold)",
                summary.bought, summary.sold
            )),
        );
    }

    fn on_converted(&self, stats: &ConversionStats) {
        eprintln!(
            "{} Conversion cost calculated and applied  {}",
            green("✔"),
            dim(&format!(
                "({}/{} transactions)",
                stats.converted_entries, stats.total_entries
            )),
        );
    }

    fn on_exported(&self, receipt: &ExportReceipt) {
        eprintln!(
            "{} File successfully written  →  {}  {}",
            green("✔"),
            bold(&receipt.location.display().to_string()),
            dim(&format!("{} bytes", receipt.bytes)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert and write ./converted/<same name>.json
  bondconv ~/.runelite/trades/player.json

  # Day-first dates, custom output directory
  bondconv --date-format day-first -o ~/Desktop player.json

  # Look at the bond transactions without converting
  bondconv --show-only player.json

  # Pipe the converted save file somewhere else
  bondconv --stdout player.json > player.converted.json

  # Machine-readable report
  bondconv --json player.json

WHAT IT DOES:
  Finds the trade record with id 13190 (Old school bond) and sets
  conversionCost = price × 0.10 on every BOUGHT transaction. SOLD
  transactions and every other field of the file are left untouched.

ENVIRONMENT VARIABLES:
  BONDCONV_OUT_DIR        Default for --out-dir
  BONDCONV_DATE_FORMAT    Default for --date-format
  RUST_LOG                Overrides the log filter (e.g. bond_converter=debug)
"#;

/// Apply the bond conversion cost to a trade-tracker save file.
#[derive(Parser, Debug)]
#[command(
    name = "bondconv",
    version,
    about = "Apply the Old School bond conversion cost to a trade-tracker save file",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Save file to import (.json).
    input: PathBuf,

    /// Directory the converted file is written to, under its original name.
    #[arg(short, long, env = "BONDCONV_OUT_DIR", default_value = "converted")]
    out_dir: PathBuf,

    /// Write the converted JSON to stdout instead of a file.
    #[arg(long, conflicts_with = "show_only")]
    stdout: bool,

    /// Date pattern for the transaction table.
    #[arg(long, env = "BONDCONV_DATE_FORMAT", value_enum, default_value = "month-first")]
    date_format: DateFormatArg,

    /// Render dates in the local time zone instead of UTC.
    #[arg(long)]
    local_time: bool,

    /// Trade record id to convert.
    #[arg(long, default_value_t = BOND_ITEM_ID)]
    target_id: u64,

    /// Conversion cost as a fraction of the price (0.0–1.0).
    #[arg(long, default_value_t = DEFAULT_CONVERSION_RATE)]
    rate: f64,

    /// Import and display only; do not convert or write anything.
    #[arg(long)]
    show_only: bool,

    /// Print a JSON report (summary, stats, rows) instead of tables.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DateFormatArg {
    MonthFirst,
    DayFirst,
}

impl From<DateFormatArg> for DateFormat {
    fn from(v: DateFormatArg) -> Self {
        match v {
            DateFormatArg::MonthFirst => DateFormat::MonthFirst,
            DateFormatArg::DayFirst => DateFormat::DayFirst,
        }
    }
}

/// Shape of `--json` output.
#[derive(Serialize)]
struct JsonReport<'a> {
    file_name: Option<&'a str>,
    summary: Option<TradeSummary>,
    stats: Option<ConversionStats>,
    rows: Vec<TransactionRow>,
    export: Option<ExportReceipt>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Status lines come from `CliObserver`; library logs stay at WARN
    // unless asked for.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            match e.downcast_ref::<BondError>() {
                Some(err) => eprintln!("{} {}", red("✘"), red(&err.user_message())),
                None => eprintln!("{} {:#}", red("✘"), e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let mut session = Session::new(config);

    session.import(&FsSource, &cli.input)?;
    let show_tables = !cli.quiet && !cli.json && !cli.stdout;
    let stdout = io::stdout();

    if cli.show_only {
        if cli.json {
            print_json(&session, None)?;
        } else if show_tables {
            write_document(&mut stdout.lock(), &session)?;
        }
        return Ok(());
    }

    convert_and_show(&mut session, show_tables, &mut stdout.lock())?;

    if cli.stdout {
        write_export(&mut stdout.lock(), &session)?;
        return Ok(());
    }

    let receipt = session.export(&DirSink::new(cli.out_dir.clone()))?;
    if cli.json {
        print_json(&session, Some(receipt))?;
    }
    Ok(())
}

/// Show the imported table, convert, then show it again with costs filled in.
fn convert_and_show(session: &mut Session, show_tables: bool, out: &mut impl Write) -> Result<()> {
    if show_tables {
        write_document(out, session)?;
    }
    session.convert()?;
    if show_tables {
        write_document(out, session)?;
    }
    Ok(())
}

/// The export text exactly as a file would hold it.
fn write_export(out: &mut impl Write, session: &Session) -> Result<()> {
    let text = session.export_text()?;
    out.write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    out.flush().context("Failed to write to stdout")?;
    Ok(())
}

/// Map CLI args to `ConverterConfig`.
fn build_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut builder = ConverterConfig::builder()
        .target_id(cli.target_id)
        .conversion_rate(cli.rate)
        .date_format(cli.date_format.into())
        .time_zone(if cli.local_time {
            TimeZoneMode::Local
        } else {
            TimeZoneMode::Utc
        });

    if !cli.quiet && !cli.json {
        builder = builder.observer(Arc::new(CliObserver));
    }

    builder.build().context("Invalid configuration")
}

fn write_document(out: &mut impl Write, session: &Session) -> Result<()> {
    let (Some(summary), Some(rows)) = (session.summary(), session.rows()) else {
        return Ok(());
    };
    writeln!(out)?;
    out.write_all(render_summary(&summary).as_bytes())?;
    writeln!(out)?;
    out.write_all(render_table(&rows).as_bytes())?;
    writeln!(out)?;
    Ok(())
}

fn print_json(session: &Session, export: Option<ExportReceipt>) -> Result<()> {
    let stats = match session.state() {
        bond_converter::SessionState::Converted { stats, .. } => Some(*stats),
        _ => None,
    };
    let report = JsonReport {
        file_name: session.file_name(),
        summary: session.summary(),
        stats,
        rows: session.rows().unwrap_or_default(),
        export,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
    println!("{json}");
    Ok(())
}
