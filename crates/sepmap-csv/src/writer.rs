//! Row sink backed by a `csv::Writer`.

use std::collections::HashMap;
use std::io::Write;

use sepmap_core::RowSink;

use crate::error::CsvSinkError;

/// Writes header-addressed rows as delimited records.
///
/// Cells are buffered per row and laid out in header order when the row is
/// closed; a column never set in a row is written empty.
#[derive(Debug)]
pub struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
    index: HashMap<String, usize>,
    width: usize,
    current: Option<Vec<String>>,
}

impl<W: Write> CsvRowSink<W> {
    /// Wrap a writer that was built with `has_headers(false)`; the header is
    /// written by [`RowSink::write_header`].
    pub fn new(writer: csv::Writer<W>) -> Self {
        Self {
            writer,
            index: HashMap::new(),
            width: 0,
            current: None,
        }
    }
}

impl<W: Write> RowSink for CsvRowSink<W> {
    type Output = W;
    type Error = CsvSinkError;

    fn write_header(&mut self, columns: &[&str]) -> Result<(), Self::Error> {
        self.index = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| ((*column).to_string(), idx))
            .collect();
        self.width = columns.len();
        self.writer.write_record(columns)?;
        Ok(())
    }

    fn begin_row(&mut self) -> Result<(), Self::Error> {
        self.current = Some(vec![String::new(); self.width]);
        Ok(())
    }

    fn set_cell(&mut self, column: &str, text: &str) -> Result<(), Self::Error> {
        let idx = *self
            .index
            .get(column)
            .ok_or_else(|| CsvSinkError::UnknownColumn {
                column: column.to_string(),
            })?;
        let row = self.current.as_mut().ok_or(CsvSinkError::NoOpenRow)?;
        row[idx] = text.to_string();
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), Self::Error> {
        let row = self.current.take().ok_or(CsvSinkError::NoOpenRow)?;
        self.writer.write_record(&row)?;
        Ok(())
    }

    fn finish(mut self) -> Result<Self::Output, Self::Error> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| CsvSinkError::Io(e.into_error()))
    }
}
