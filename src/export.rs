use std::path::Path;

use anyhow::{Context, Result};

use crate::models::PriceTable;

/// Serialize the price table as CSV: header row `Date` followed by the
/// tickers in table order, then one record per trading date. Missing cells
/// become empty fields. The file is created or truncated in a single pass.
pub fn write_close_prices(table: &PriceTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;

    let mut header = Vec::with_capacity(table.tickers().len() + 1);
    header.push("Date".to_string());
    header.extend(table.tickers().iter().cloned());
    writer.write_record(&header)?;

    for (date, closes) in table.rows() {
        let mut record = Vec::with_capacity(header.len());
        record.push(date.format("%Y-%m-%d").to_string());
        for close in closes {
            record.push(close.map(format_close).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush output file {}", path.display()))?;

    Ok(())
}

/// Shortest round-trip form, keeping a trailing ".0" on whole prices
/// so 185.0 serializes as "185.0" rather than "185"
fn format_close(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_header_matches_requested_ticker_order() {
        let table = PriceTable::new(&["AAPL", "MSFT", "V"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_close_prices(&table, &path).unwrap();

        assert_eq!(read(&path), "Date,AAPL,MSFT,V\n");
    }

    #[test]
    fn test_one_row_per_trading_date() {
        let mut table = PriceTable::new(&["AAPL", "MSFT"]);
        table.insert_close("AAPL", date(2025, 1, 2), 185.0);
        table.insert_close("MSFT", date(2025, 1, 2), 410.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_close_prices(&table, &path).unwrap();

        assert_eq!(read(&path), "Date,AAPL,MSFT\n2025-01-02,185.0,410.0\n");
    }

    #[test]
    fn test_missing_cells_render_as_empty_fields() {
        let mut table = PriceTable::new(&["AAPL", "MSFT"]);
        table.insert_close("AAPL", date(2025, 1, 2), 185.0);
        table.insert_close("MSFT", date(2025, 1, 3), 412.25);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_close_prices(&table, &path).unwrap();

        assert_eq!(
            read(&path),
            "Date,AAPL,MSFT\n2025-01-02,185.0,\n2025-01-03,,412.25\n"
        );
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let mut table = PriceTable::new(&["AAPL"]);
        table.insert_close("AAPL", date(2025, 1, 2), 185.6437);
        table.insert_close("AAPL", date(2025, 1, 3), 187.5);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_close_prices(&table, &path).unwrap();
        let first = std::fs::read(&path).unwrap();

        write_close_prices(&table, &path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_overwrites_previous_contents() {
        let mut big = PriceTable::new(&["AAPL"]);
        big.insert_close("AAPL", date(2025, 1, 2), 185.0);
        big.insert_close("AAPL", date(2025, 1, 3), 187.5);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_close_prices(&big, &path).unwrap();

        let mut small = PriceTable::new(&["AAPL"]);
        small.insert_close("AAPL", date(2025, 1, 2), 185.0);
        write_close_prices(&small, &path).unwrap();

        assert_eq!(read(&path), "Date,AAPL\n2025-01-02,185.0\n");
    }

    #[test]
    fn test_close_values_are_untransformed() {
        assert_eq!(format_close(185.0), "185.0");
        assert_eq!(format_close(410.0), "410.0");
        assert_eq!(format_close(185.6437), "185.6437");
        assert_eq!(format_close(0.07), "0.07");
    }
}
