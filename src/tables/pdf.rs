use std::path::Path;

use lopdf::Document;

use super::{Table, TableError, TableExtractor};

/// Reads tables out of the text layer of a PDF.
///
/// Cells are separated by tabs or by two or more spaces. Consecutive lines
/// with at least two cells form one table whose first line is the header.
pub struct PdfTables;

impl TableExtractor for PdfTables {
    fn extract(&self, path: &Path) -> Result<Vec<Table>, TableError> {
        if !path.exists() {
            return Err(TableError::NotFound(path.to_path_buf()));
        }

        let doc = Document::load(path).map_err(|e| TableError::Pdf(e.to_string()))?;

        let mut tables = Vec::new();
        for (page, _) in doc.get_pages() {
            let text = doc
                .extract_text(&[page])
                .map_err(|e| TableError::Pdf(format!("page {page}: {e}")))?;
            let found = split_tables(&text);
            log::debug!("page {page}: {} table(s)", found.len());
            tables.extend(found);
        }

        Ok(tables)
    }
}

pub fn split_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Option<Table> = None;

    for line in text.lines() {
        let cells = split_cells(line);
        if cells.len() < 2 {
            tables.extend(current.take());
            continue;
        }

        match &mut current {
            Some(table) => table.rows.push(cells),
            None => {
                current = Some(Table {
                    headers: cells,
                    rows: Vec::new(),
                })
            }
        }
    }
    tables.extend(current);

    tables
}

fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut spaces = 0;

    for c in line.chars() {
        match c {
            '\t' => {
                spaces = 2;
            }
            ' ' => {
                spaces += 1;
            }
            _ => {
                if spaces >= 2 && !cell.is_empty() {
                    cells.push(std::mem::take(&mut cell));
                } else if spaces == 1 && !cell.is_empty() {
                    cell.push(' ');
                }
                spaces = 0;
                cell.push(c);
            }
        }
    }
    if !cell.is_empty() {
        cells.push(cell);
    }

    cells
}
