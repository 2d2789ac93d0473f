use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::utils::write_atomically;

pub mod hotels;
pub mod pdf;

pub const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum TableError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read PDF: {0}")]
    Pdf(String),
    #[error("{} has no {column:?} column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// One table as found in a document: a header line and the rows below it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub trait TableExtractor {
    /// Tables in page order, several per page allowed.
    fn extract(&self, path: &Path) -> Result<Vec<Table>, TableError>;
}

/// Writes all tables into one semicolon separated file under the first
/// table's header.
///
/// A later table with a different header is taken to be the continuation of
/// a table broken across pages, so its header line is kept as a data row.
pub fn write_csv(tables: &[Table], path: &Path) -> Result<usize> {
    let Some(first) = tables.first() else {
        write_atomically(path, |_| Ok(()))?;
        return Ok(0);
    };
    let width = first.headers.len();

    let mut rows = Vec::new();
    for (i, table) in tables.iter().enumerate() {
        if i > 0 && table.headers != first.headers {
            rows.push(&table.headers);
        }
        rows.extend(&table.rows);
    }

    write_atomically(path, |w| {
        let mut out = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(w);
        out.write_record(&first.headers)?;
        for row in &rows {
            out.write_record(
                (0..width).map(|i| row.get(i).map(|x| x.as_str()).unwrap_or_default()),
            )?;
        }
        out.flush()?;
        Ok(())
    })?;

    Ok(rows.len())
}
