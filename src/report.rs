//! Plain-text rendering of the transaction table.

use crate::output::{TradeSummary, TransactionRow};

const HEADERS: [&str; 3] = ["Date", "Price", "Conversion Cost"];

/// Render rows as an aligned three-column table (Date, Price, Conversion Cost).
///
/// Prices and costs are right-aligned. An empty slice still renders the header.
pub fn render_table(rows: &[TransactionRow]) -> String {
    let cells: Vec<[&str; 3]> = rows
        .iter()
        .map(|r| [r.date.as_str(), r.price.as_str(), r.conversion_cost_label()])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let [wd, wp, wc] = widths;
    out.push_str(&format!(
        "{:<wd$}  {:>wp$}  {:>wc$}\n",
        HEADERS[0], HEADERS[1], HEADERS[2]
    ));
    out.push_str(&format!("{}  {}  {}\n", "─".repeat(wd), "─".repeat(wp), "─".repeat(wc)));
    for [date, price, cost] in cells {
        out.push_str(&format!("{date:<wd$}  {price:>wp$}  {cost:>wc$}\n"));
    }
    out
}

/// The "Quantity Bought / Quantity Sold" lines.
pub fn render_summary(summary: &TradeSummary) -> String {
    let mut out = format!(
        "Quantity Bought: {}\nQuantity Sold: {}\n",
        summary.bought, summary.sold
    );
    if summary.other > 0 {
        out.push_str(&format!("Other: {}\n", summary.other));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, price: &str, cost: Option<&str>) -> TransactionRow {
        TransactionRow {
            uuid: None,
            date: date.into(),
            price: price.into(),
            conversion_cost: cost.map(Into::into),
        }
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&[
            row("01/05/2023", "1000", Some("100")),
            row("01/06/2023", "13000002", None),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[2].ends_with("            100"));
        assert!(lines[3].ends_with("N/A"));
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "ragged table: {table}");
    }

    #[test]
    fn empty_table_has_header() {
        let table = render_table(&[]);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn summary_lines() {
        let s = TradeSummary {
            bought: 2,
            sold: 1,
            other: 0,
            total: 3,
        };
        assert_eq!(render_summary(&s), "Quantity Bought: 2\nQuantity Sold: 1\n");
    }
}
