//! Delimited-text front end for `sepmap-core`.
//!
//! [`SepMapper`] pairs a [`MapperRegistry`] with [`SepOptions`] and reads or
//! writes model instances from strings, streams and files. The row
//! collaborators [`CsvRowSource`] and [`CsvRowSink`] are built on the `csv`
//! crate and can also be driven directly through
//! [`MapperRegistry::read`] and [`MapperRegistry::write`].
//!
//! # Example
//!
//! ```
//! use sepmap_csv::{CsvMapError, SepMapper, SepOptions};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Something {
//!     a: String,
//!     i: i32,
//! }
//!
//! let mut mapper = SepMapper::new(SepOptions::default().with_delimiter(';'))?;
//! mapper
//!     .register_class::<Something>()?
//!     .add_property("A", |s: &Something| s.a.clone(), |s: &mut Something, v| s.a = v)?
//!     .add_property("I", |s: &Something| s.i, |s: &mut Something, v| s.i = v)?;
//!
//! let items: Vec<Something> = mapper.read_str("A;I\nraw;1\n")?;
//! assert_eq!(items[0].i, 1);
//! assert_eq!(mapper.write_string(&items)?, "A;I\nraw;1\n");
//! # Ok::<(), CsvMapError>(())
//! ```

#![deny(unsafe_code)]

mod context;
mod error;
mod options;
mod reader;
mod writer;

pub use context::SepMapper;
pub use error::{CsvMapError, CsvSinkError, Result};
pub use options::{LineTerminator, SepOptions};
pub use reader::CsvRowSource;
pub use writer::CsvRowSink;

// Re-export the mapping core so callers need only this crate.
pub use sepmap_core::{
    ColumnRule, ConvertError, FromCell, MapError, MapperRegistry, PropertyRule, RuleSet, ToCell,
};
