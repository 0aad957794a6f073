//! CSV export of report tables.
//!
//! Header row is the table's column list; cells are written as-is. The same table
//! always produces byte-identical output.

use std::io::{self, Read, Write};

use crate::error::ReportError;
use crate::table::ReportTable;

pub fn write_csv<W: Write>(table: &ReportTable, writer: W) -> Result<(), ReportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.columns)?;
    for row in &table.rows {
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &ReportTable) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ReportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Reads an exported table back. The title is not part of the CSV and is left empty.
pub fn read_csv<R: Read>(reader: R) -> Result<ReportTable, ReportError> {
    let mut input = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let columns = input.headers()?.iter().map(str::to_string).collect();
    let rows = input
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;
    Ok(ReportTable {
        title: String::new(),
        columns,
        rows,
    })
}

/// `plan_30d.csv` style default file name for a plan export.
pub fn plan_file_name(coverage_days: u32) -> String {
    format!("plan_{coverage_days}d.csv")
}

pub const BALANCE_FILE_NAME: &str = "balance.csv";
