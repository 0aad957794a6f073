//! Report rendering and delivery (stdout or file).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use restock_reports::csv_export::to_csv_string;
use restock_reports::document::{PageSetup, PagedDocument};
use restock_reports::{ReportTable, ToTable};

use crate::args::OutputFormat;
use crate::config::DocumentConfig;

/// Renders `report` in `format`. JSON serializes the report itself; every other
/// format goes through its table.
pub fn render<R>(report: &R, format: OutputFormat, document: &DocumentConfig) -> Result<Vec<u8>>
where
    R: ToTable + Serialize,
{
    let bytes = match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_vec_pretty(report)?;
            out.push(b'\n');
            out
        }
        OutputFormat::Csv => to_csv_string(&report.to_table())?.into_bytes(),
        OutputFormat::Table => render_table(&report.to_table(), document.cell_width)?.into_bytes(),
        OutputFormat::Document => PagedDocument::layout(&report.to_table(), document.page_setup())?
            .render_text()
            .into_bytes(),
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => {
            let doc = PagedDocument::layout(&report.to_table(), document.page_setup())?;
            restock_reports::document::pdf::render_pdf(&doc, &document.font_dir, &document.font_name)?
        }
    };
    Ok(bytes)
}

/// Whole table on one page.
fn render_table(table: &ReportTable, cell_width: usize) -> Result<String> {
    let setup = PageSetup {
        rows_per_page: table.len().max(1),
        cell_width,
    };
    Ok(PagedDocument::layout(table, setup)?.render_text())
}

/// Where the rendered bytes go: `None` is stdout, a directory receives `default_name`.
pub fn resolve_target(output: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    output.map(|path| {
        if path.is_dir() {
            path.join(default_name)
        } else {
            path.to_path_buf()
        }
    })
}

pub fn deliver(bytes: &[u8], target: Option<&Path>) -> Result<()> {
    match target {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
