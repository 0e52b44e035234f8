//! Row collaborators consumed and fed by the conversion pipeline.
//!
//! The pipeline never tokenizes text itself. It pulls rows from a
//! [`RowSource`] and pushes rows into a [`RowSink`]; delimiter and quoting
//! rules live entirely in the implementations. [`Records`] is the in-memory
//! implementation of both.

use std::collections::HashMap;
use std::convert::Infallible;

use thiserror::Error;

/// Supplier of rows, each exposing its header and per-column cell text.
pub trait RowSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advance to the next row. Returns `Ok(false)` once input is exhausted.
    fn next_row(&mut self) -> Result<bool, Self::Error>;

    /// Column names of the current row, in input order.
    fn header(&self) -> &[String];

    /// Raw text of `column` in the current row, if the row has that cell.
    fn cell(&self, column: &str) -> Option<&str>;
}

/// Consumer of rows produced by Write.
///
/// The pipeline calls [`write_header`](Self::write_header) once, then
/// `begin_row`, `set_cell` for every column and `end_row` per instance, and
/// finally [`finish`](Self::finish).
pub trait RowSink {
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_header(&mut self, columns: &[&str]) -> Result<(), Self::Error>;

    fn begin_row(&mut self) -> Result<(), Self::Error>;

    fn set_cell(&mut self, column: &str, text: &str) -> Result<(), Self::Error>;

    fn end_row(&mut self) -> Result<(), Self::Error>;

    /// Finalize the output.
    fn finish(self) -> Result<Self::Output, Self::Error>;
}

/// Errors from the in-memory [`RecordsWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordsError {
    #[error("column '{column}' is not part of the header")]
    UnknownColumn { column: String },

    #[error("no row is open")]
    NoOpenRow,
}

/// An in-memory table of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Records {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; cells are matched to the header by position.
    #[must_use]
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// A row source over these records.
    pub fn reader(&self) -> RecordsReader<'_> {
        RecordsReader {
            records: self,
            index: header_index(&self.header),
            current: None,
        }
    }

    /// A row sink that collects rows into a new `Records`.
    pub fn writer() -> RecordsWriter {
        RecordsWriter::default()
    }
}

fn header_index(header: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(header.len());
    for (idx, column) in header.iter().enumerate() {
        index.entry(column.clone()).or_insert(idx);
    }
    index
}

/// [`RowSource`] over borrowed [`Records`].
#[derive(Debug)]
pub struct RecordsReader<'a> {
    records: &'a Records,
    index: HashMap<String, usize>,
    current: Option<usize>,
}

impl RowSource for RecordsReader<'_> {
    type Error = Infallible;

    fn next_row(&mut self) -> Result<bool, Self::Error> {
        let next = self.current.map_or(0, |row| row + 1);
        self.current = Some(next);
        Ok(next < self.records.rows.len())
    }

    fn header(&self) -> &[String] {
        &self.records.header
    }

    fn cell(&self, column: &str) -> Option<&str> {
        let row = self.records.rows.get(self.current?)?;
        let idx = *self.index.get(column)?;
        row.get(idx).map(String::as_str)
    }
}

/// [`RowSink`] producing [`Records`].
#[derive(Debug, Default)]
pub struct RecordsWriter {
    records: Records,
    index: HashMap<String, usize>,
    current: Option<Vec<String>>,
}

impl RowSink for RecordsWriter {
    type Output = Records;
    type Error = RecordsError;

    fn write_header(&mut self, columns: &[&str]) -> Result<(), Self::Error> {
        self.records.header = columns.iter().map(|c| (*c).to_string()).collect();
        self.index = header_index(&self.records.header);
        Ok(())
    }

    fn begin_row(&mut self) -> Result<(), Self::Error> {
        self.current = Some(vec![String::new(); self.records.header.len()]);
        Ok(())
    }

    fn set_cell(&mut self, column: &str, text: &str) -> Result<(), Self::Error> {
        let idx = *self
            .index
            .get(column)
            .ok_or_else(|| RecordsError::UnknownColumn {
                column: column.to_string(),
            })?;
        let row = self.current.as_mut().ok_or(RecordsError::NoOpenRow)?;
        row[idx] = text.to_string();
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), Self::Error> {
        let row = self.current.take().ok_or(RecordsError::NoOpenRow)?;
        self.records.rows.push(row);
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, Self::Error> {
        Ok(self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_walks_rows_in_order() {
        let records = Records::new(["A", "B"])
            .with_row(["1", "2"])
            .with_row(["3", "4"]);
        let mut reader = records.reader();

        assert!(reader.next_row().unwrap());
        assert_eq!(reader.cell("B"), Some("2"));
        assert!(reader.next_row().unwrap());
        assert_eq!(reader.cell("A"), Some("3"));
        assert!(!reader.next_row().unwrap());
        assert_eq!(reader.cell("A"), None);
    }

    #[test]
    fn test_reader_handles_short_rows_and_unknown_columns() {
        let records = Records::new(["A", "B"]).with_row(["1"]);
        let mut reader = records.reader();

        assert!(reader.next_row().unwrap());
        assert_eq!(reader.cell("A"), Some("1"));
        assert_eq!(reader.cell("B"), None);
        assert_eq!(reader.cell("C"), None);
    }

    #[test]
    fn test_duplicate_header_resolves_to_first_column() {
        let records = Records::new(["A", "A"]).with_row(["first", "second"]);
        let mut reader = records.reader();

        assert!(reader.next_row().unwrap());
        assert_eq!(reader.cell("A"), Some("first"));
    }

    #[test]
    fn test_writer_places_cells_by_column() {
        let mut writer = Records::writer();
        writer.write_header(&["A", "B"]).unwrap();
        writer.begin_row().unwrap();
        writer.set_cell("B", "2").unwrap();
        writer.end_row().unwrap();
        let records = writer.finish().unwrap();

        assert_eq!(records, Records::new(["A", "B"]).with_row(["", "2"]));
    }

    #[test]
    fn test_writer_rejects_unknown_column_and_closed_row() {
        let mut writer = Records::writer();
        writer.write_header(&["A"]).unwrap();

        assert_eq!(writer.set_cell("A", "x"), Err(RecordsError::NoOpenRow));
        writer.begin_row().unwrap();
        assert_eq!(
            writer.set_cell("Z", "x"),
            Err(RecordsError::UnknownColumn {
                column: "Z".to_string()
            })
        );
        writer.end_row().unwrap();
        assert_eq!(writer.end_row(), Err(RecordsError::NoOpenRow));
    }
}
