//! Row source backed by a `csv::Reader`.

use std::collections::HashMap;
use std::io::Read;

use sepmap_core::RowSource;

/// Reads delimited records, exposing each as a header-addressed row.
///
/// The header is read once at construction. A UTF-8 byte order mark in front
/// of the first column name is dropped, and when a column name appears more
/// than once the first occurrence wins for cell lookup.
#[derive(Debug)]
pub struct CsvRowSource<R> {
    reader: csv::Reader<R>,
    header: Vec<String>,
    index: HashMap<String, usize>,
    record: csv::StringRecord,
}

impl<R: Read> CsvRowSource<R> {
    /// Wrap a reader that was built with `has_headers(true)`.
    pub fn new(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let header: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if idx == 0 {
                    name.trim_start_matches('\u{feff}').to_string()
                } else {
                    name.to_string()
                }
            })
            .collect();

        let mut index = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            index.entry(name.clone()).or_insert(idx);
        }

        tracing::trace!(columns = header.len(), "read CSV header");
        Ok(Self {
            reader,
            header,
            index,
            record: csv::StringRecord::new(),
        })
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    type Error = csv::Error;

    fn next_row(&mut self) -> Result<bool, Self::Error> {
        self.reader.read_record(&mut self.record)
    }

    fn header(&self) -> &[String] {
        &self.header
    }

    fn cell(&self, column: &str) -> Option<&str> {
        let idx = *self.index.get(column)?;
        self.record.get(idx)
    }
}
