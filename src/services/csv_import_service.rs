use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;
use tracing::debug;

use crate::models::GoldPrice;
use crate::utils::normalize_date;

/// Label row plus header row plus at least one data row.
pub const MIN_CSV_LINES: usize = 3;

const DATE_COLUMN: usize = 1;
const PRICE_COLUMN: usize = 2;

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("error reading CSV: {0}")]
    Read(#[from] csv::Error),
    #[error("CSV file must be valid UTF-8 text")]
    NotUtf8,
    #[error("CSV file must have at least 3 lines (header + data), found {found}")]
    TooFewLines { found: usize },
    #[error("no valid data rows found in CSV")]
    NoValidRows,
}

/// Decode raw upload bytes and parse them.
pub fn parse_gold_price_bytes(content: &[u8]) -> Result<Vec<GoldPrice>, CsvImportError> {
    let text = std::str::from_utf8(content).map_err(|_| CsvImportError::NotUtf8)?;
    parse_gold_price_csv(text)
}

/// Parse a daily gold price CSV into price records.
///
/// The first row is always dropped. Every later row needs a date in column 1
/// and a USD per-ounce price in column 2; rows that are short, blank, or fail
/// to parse are skipped. Output keeps input order.
pub fn parse_gold_price_csv(content: &str) -> Result<Vec<GoldPrice>, CsvImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

    if rows.len() < MIN_CSV_LINES {
        return Err(CsvImportError::TooFewLines { found: rows.len() });
    }

    let prices: Vec<GoldPrice> = rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(line, row)| {
            let price = parse_row(row);
            if price.is_none() {
                debug!("Skipping CSV line {}: {:?}", line + 1, row);
            }
            price
        })
        .collect();

    if prices.is_empty() {
        return Err(CsvImportError::NoValidRows);
    }

    Ok(prices)
}

fn parse_row(row: &StringRecord) -> Option<GoldPrice> {
    if row.len() <= PRICE_COLUMN {
        return None;
    }

    let date_str = row.get(DATE_COLUMN)?.trim();
    let price_str = row.get(PRICE_COLUMN)?.trim();
    if date_str.is_empty() || price_str.is_empty() {
        return None;
    }

    let price_per_ounce = price_str.parse::<f64>().ok().filter(|p| p.is_finite())?;
    let date = normalize_date(date_str)?;

    Some(GoldPrice::from_ounce_price(&date, price_per_ounce))
}
