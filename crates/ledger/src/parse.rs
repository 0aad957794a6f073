//! CSV parsing for the two input tables.
//!
//! Expected columns:
//!   items:     Item ID, Name, Description (optional), Image (optional)
//!   movements: Item ID, DateTime, Amount
//!
//! Movement rows with a blank id or an unreadable timestamp are skipped and reported;
//! a non-numeric amount fails the whole load.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use restock_core::{DomainError, ItemId};
use restock_inventory::{Item, ItemTable, MovementRecord, MovementTable};

use crate::error::LoadError;

pub const ITEM_ID: &str = "Item ID";
pub const NAME: &str = "Name";
pub const DESCRIPTION: &str = "Description";
pub const IMAGE: &str = "Image";
pub const DATE_TIME: &str = "DateTime";
pub const AMOUNT: &str = "Amount";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// A row excluded from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub table: &'static str,
    /// 1-based line in the source text (header is line 1).
    pub line: u64,
    pub reason: String,
}

/// What the loader recovered from while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub skipped_rows: Vec<SkippedRow>,
    /// Catalog ids that appeared more than once (first row kept).
    pub duplicate_items: Vec<ItemId>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped_rows.len()
    }

    fn skip(&mut self, table: &'static str, line: u64, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(table, line, %reason, "skipping malformed row");
        self.skipped_rows.push(SkippedRow { table, line, reason });
    }
}

/// Parse a timestamp cell. RFC 3339 values keep their wall-clock time; date-only values
/// mean midnight. Returns `None` for anything unrecognized.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

fn parse_amount(raw: &str, line: u64) -> Result<Decimal, DomainError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| DomainError::data_format(format!("line {line}: amount '{raw}' is not a number")))
}

struct Columns {
    headers: csv::StringRecord,
    table: &'static str,
}

impl Columns {
    fn find(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
    }

    fn require(&self, column: &'static str) -> Result<usize, LoadError> {
        self.find(column).ok_or(LoadError::MissingColumn {
            table: self.table,
            column,
        })
    }
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn columns(reader: &mut csv::Reader<&[u8]>, table: &'static str) -> Result<Columns, LoadError> {
    let headers = reader
        .headers()
        .map_err(|e| DomainError::data_format(format!("{table} header row: {e}")))?
        .clone();
    Ok(Columns { headers, table })
}

fn cell<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i)).filter(|v| !v.is_empty())
}

fn line_of(record: &csv::StringRecord, fallback: u64) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(fallback)
}

/// Parse the item catalog.
pub fn parse_items(text: &str, report: &mut LoadReport) -> Result<ItemTable, LoadError> {
    const TABLE: &str = "items";
    let mut reader = csv_reader(text);
    let cols = columns(&mut reader, TABLE)?;
    let id_col = cols.require(ITEM_ID)?;
    let name_col = cols.require(NAME)?;
    let description_col = cols.find(DESCRIPTION);
    let image_col = cols.find(IMAGE);

    let mut items = Vec::new();
    for (n, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DomainError::data_format(format!("{TABLE}: {e}")))?;
        let line = line_of(&record, n as u64 + 2);

        let item_id = match ItemId::parse(record.get(id_col).unwrap_or_default()) {
            Ok(id) => id,
            Err(e) => {
                report.skip(TABLE, line, e.to_string());
                continue;
            }
        };
        items.push(Item {
            item_id,
            name: cell(&record, Some(name_col)).map(str::to_string),
            description: cell(&record, description_col).map(str::to_string),
            image_reference: cell(&record, image_col).map(str::to_string),
        });
    }

    let (table, duplicates) = ItemTable::from_items(items);
    for dup in &duplicates {
        tracing::warn!(item_id = %dup, "duplicate catalog id; keeping first row");
    }
    report.duplicate_items.extend(duplicates);
    Ok(table)
}

/// Parse the movement ledger.
pub fn parse_movements(text: &str, report: &mut LoadReport) -> Result<MovementTable, LoadError> {
    const TABLE: &str = "movements";
    let mut reader = csv_reader(text);
    let cols = columns(&mut reader, TABLE)?;
    let id_col = cols.require(ITEM_ID)?;
    let time_col = cols.require(DATE_TIME)?;
    let amount_col = cols.require(AMOUNT)?;

    let mut records = Vec::new();
    for (n, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DomainError::data_format(format!("{TABLE}: {e}")))?;
        let line = line_of(&record, n as u64 + 2);

        let item_id = match ItemId::parse(record.get(id_col).unwrap_or_default()) {
            Ok(id) => id,
            Err(e) => {
                report.skip(TABLE, line, e.to_string());
                continue;
            }
        };

        let raw_time = record.get(time_col).unwrap_or_default();
        let Some(timestamp) = parse_timestamp(raw_time) else {
            report.skip(TABLE, line, format!("unparseable timestamp '{raw_time}'"));
            continue;
        };

        // Only rows that survive the id and timestamp checks can fail the load.
        let amount = parse_amount(record.get(amount_col).unwrap_or_default(), line)?;
        records.push(MovementRecord::new(item_id, timestamp, amount));
    }

    Ok(MovementTable::new(records))
}
