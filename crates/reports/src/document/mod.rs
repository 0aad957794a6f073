//! Paginated document export.
//!
//! A table is split into pages of `rows_per_page` data rows, each page repeating the
//! header row. Cells longer than `cell_width` characters are cut and end with `~`.

#[cfg(feature = "pdf")]
pub mod pdf;

use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult};

use crate::table::ReportTable;

pub const TRUNCATION_MARKER: char = '~';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetup {
    pub rows_per_page: usize,
    pub cell_width: usize,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            rows_per_page: 40,
            cell_width: 24,
        }
    }
}

impl PageSetup {
    pub fn validate(&self) -> DomainResult<()> {
        if self.rows_per_page == 0 {
            return Err(DomainError::validation("rows_per_page must be positive"));
        }
        // Room for at least one character plus the marker.
        if self.cell_width < 2 {
            return Err(DomainError::validation("cell_width must be at least 2"));
        }
        Ok(())
    }
}

/// Cuts `value` to at most `width` characters (not bytes).
pub fn truncate_cell(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push(TRUNCATION_MARKER);
    cut
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedDocument {
    pub title: String,
    pub setup: PageSetup,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    /// Lays the table out in pages. An empty table still yields one page with the header.
    pub fn layout(table: &ReportTable, setup: PageSetup) -> DomainResult<Self> {
        setup.validate()?;

        let fit = |row: &[String]| -> Vec<String> {
            row.iter()
                .map(|cell| truncate_cell(cell, setup.cell_width))
                .collect()
        };
        let header = fit(&table.columns);

        let mut pages: Vec<Page> = table
            .rows
            .chunks(setup.rows_per_page)
            .enumerate()
            .map(|(i, chunk)| Page {
                number: i + 1,
                header: header.clone(),
                rows: chunk.iter().map(|row| fit(row)).collect(),
            })
            .collect();
        if pages.is_empty() {
            pages.push(Page {
                number: 1,
                header,
                rows: Vec::new(),
            });
        }

        Ok(Self {
            title: table.title.clone(),
            setup,
            pages,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Fixed-width plain-text rendering, one block per page separated by a form feed.
    pub fn render_text(&self) -> String {
        let width = self.setup.cell_width;
        let line = |cells: &[String]| -> String {
            let mut out = cells
                .iter()
                .map(|c| format!("{c:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ");
            out.truncate(out.trim_end().len());
            out
        };

        let total = self.pages.len();
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push('\u{c}');
                out.push('\n');
            }
            out.push_str(&format!("{} (page {}/{})\n", self.title, page.number, total));
            let header = line(&page.header);
            out.push_str(&header);
            out.push('\n');
            out.push_str(&"-".repeat(header.chars().count()));
            out.push('\n');
            for row in &page.rows {
                out.push_str(&line(row));
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(rows: usize) -> ReportTable {
        let mut t = ReportTable::new("Balances", ["Item ID", "Name"]);
        for i in 0..rows {
            t.push_row(vec![format!("I{i}"), format!("Item number {i}")]);
        }
        t
    }

    #[test]
    fn truncation_marks_cut_cells() {
        assert_eq!(truncate_cell("Gloves", 10), "Gloves");
        assert_eq!(truncate_cell("Nitrile gloves", 8), "Nitrile~");
        assert_eq!(truncate_cell("Élévation", 4), "Élé~");
    }

    #[test]
    fn every_page_repeats_the_header() {
        let setup = PageSetup {
            rows_per_page: 2,
            cell_width: 6,
        };
        let doc = PagedDocument::layout(&table(5), setup).unwrap();
        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages.iter().all(|p| p.header == vec!["Item ~", "Name"]));
        assert_eq!(doc.pages[2].rows.len(), 1);
        assert_eq!(doc.pages[0].rows[0], vec!["I0", "Item ~"]);
    }

    #[test]
    fn empty_table_has_one_header_page() {
        let doc = PagedDocument::layout(&table(0), PageSetup::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].rows.is_empty());
    }

    #[test]
    fn invalid_setup_is_rejected() {
        let zero_rows = PageSetup {
            rows_per_page: 0,
            cell_width: 10,
        };
        assert!(PagedDocument::layout(&table(1), zero_rows).is_err());
        let narrow = PageSetup {
            rows_per_page: 10,
            cell_width: 1,
        };
        assert!(PagedDocument::layout(&table(1), narrow).is_err());
    }

    #[test]
    fn text_rendering_separates_pages() {
        let setup = PageSetup {
            rows_per_page: 1,
            cell_width: 12,
        };
        let text = PagedDocument::layout(&table(2), setup).unwrap().render_text();
        assert_eq!(text.matches('\u{c}').count(), 1);
        assert!(text.starts_with("Balances (page 1/2)\n"));
        assert!(text.contains("I1           | Item number~"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a cut cell never exceeds the width and keeps its prefix.
        #[test]
        fn truncated_cells_fit_the_width(value in "\\PC{0,40}", width in 2usize..30) {
            let cut = truncate_cell(&value, width);
            prop_assert!(cut.chars().count() <= width);
            let kept: String = cut.trim_end_matches(TRUNCATION_MARKER).to_string();
            prop_assert!(value.starts_with(&kept));
        }

        /// Property: layout keeps every row, in order, across pages.
        #[test]
        fn layout_keeps_every_row(rows in 0usize..50, per_page in 1usize..10) {
            let doc = PagedDocument::layout(&table(rows), PageSetup { rows_per_page: per_page, cell_width: 32 }).unwrap();
            let flat: Vec<String> = doc.pages.iter().flat_map(|p| p.rows.iter().map(|r| r[0].clone())).collect();
            let expected: Vec<String> = (0..rows).map(|i| format!("I{i}")).collect();
            prop_assert_eq!(flat, expected);
        }
    }
}
