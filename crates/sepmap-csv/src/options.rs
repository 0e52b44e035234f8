//! Separator options for reading and writing delimited text.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CsvMapError, Result};

/// Record terminator used when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

/// Options describing the delimited-text dialect.
///
/// Every field has a default, so an options file only needs the keys it
/// changes:
///
/// ```toml
/// delimiter = ";"
/// trim = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SepOptions {
    /// Field delimiter. Must be ASCII.
    pub delimiter: char,
    /// Quote character. Must be ASCII and differ from the delimiter.
    pub quote: char,
    /// Trim surrounding whitespace from header names and cells when reading.
    pub trim: bool,
    /// Accept rows whose length differs from the header.
    pub flexible: bool,
    /// Record terminator when writing.
    pub line_terminator: LineTerminator,
}

impl Default for SepOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            trim: false,
            flexible: false,
            line_terminator: LineTerminator::default(),
        }
    }
}

impl SepOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_trim(mut self, enable: bool) -> Self {
        self.trim = enable;
        self
    }

    #[must_use]
    pub fn with_flexible(mut self, enable: bool) -> Self {
        self.flexible = enable;
        self
    }

    #[must_use]
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Parse options from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: Self = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file and validate them.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CsvMapError::file(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Check that the delimiter and quote can be expressed as single bytes.
    pub fn validate(&self) -> Result<()> {
        let delimiter = ascii_byte("delimiter", self.delimiter)?;
        let quote = ascii_byte("quote", self.quote)?;
        if delimiter == quote {
            return Err(CsvMapError::InvalidOptions {
                message: format!("delimiter and quote are both {:?}", self.delimiter),
            });
        }
        for (field, byte) in [("delimiter", delimiter), ("quote", quote)] {
            if matches!(byte, b'\r' | b'\n') {
                return Err(CsvMapError::InvalidOptions {
                    message: format!("{field} cannot be a line break"),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn reader_builder(&self) -> Result<csv::ReaderBuilder> {
        self.validate()?;
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(true)
            .delimiter(self.delimiter as u8)
            .quote(self.quote as u8)
            .flexible(self.flexible)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            });
        Ok(builder)
    }

    pub(crate) fn writer_builder(&self) -> Result<csv::WriterBuilder> {
        self.validate()?;
        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter as u8)
            .quote(self.quote as u8)
            .flexible(self.flexible)
            .terminator(match self.line_terminator {
                LineTerminator::Lf => csv::Terminator::Any(b'\n'),
                LineTerminator::Crlf => csv::Terminator::CRLF,
            });
        Ok(builder)
    }
}

fn ascii_byte(field: &str, value: char) -> Result<u8> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(CsvMapError::InvalidOptions {
            message: format!("{field} {value:?} is not an ASCII character"),
        })
    }
}
