//! PDF rendering of a [`PagedDocument`] through `genpdf`.

use std::path::Path;

use genpdf::{Element, elements, style};

use super::PagedDocument;
use crate::error::ReportError;

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(e.to_string())
}

/// Renders `doc` to PDF bytes. `font_dir` must contain the regular, bold, italic and
/// bold-italic files of `font_name` (e.g. `Roboto-Regular.ttf`).
pub fn render_pdf(doc: &PagedDocument, font_dir: &Path, font_name: &str) -> Result<Vec<u8>, ReportError> {
    let font_family = genpdf::fonts::from_files(font_dir, font_name, None)
        .map_err(|e| pdf_err(format!("font {font_name} not found in {}: {e}", font_dir.display())))?;

    let mut pdf = genpdf::Document::new(font_family);
    pdf.set_title(doc.title.clone());
    pdf.set_font_size(9);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    pdf.set_page_decorator(decorator);

    let bold = style::Style::new().bold();
    let total = doc.page_count();

    for (i, page) in doc.pages.iter().enumerate() {
        if i > 0 {
            pdf.push(elements::PageBreak::new());
        }
        pdf.push(
            elements::Paragraph::new(format!("{} (page {}/{})", doc.title, page.number, total))
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        pdf.push(elements::Break::new(1));

        let mut table = elements::TableLayout::new(vec![1; page.header.len().max(1)]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let mut header = table.row();
        for cell in &page.header {
            header.push_element(elements::Paragraph::new(cell.as_str()).styled(bold));
        }
        header.push().map_err(pdf_err)?;

        for row in &page.rows {
            let mut line = table.row();
            for cell in row {
                line.push_element(elements::Paragraph::new(cell.as_str()));
            }
            line.push().map_err(pdf_err)?;
        }
        pdf.push(table);
    }

    let mut buffer = Vec::new();
    pdf.render(&mut buffer).map_err(pdf_err)?;
    Ok(buffer)
}
