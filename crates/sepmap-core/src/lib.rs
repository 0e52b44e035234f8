//! Column-to-property mapping for delimited-text rows.
//!
//! This crate binds named columns to typed properties of a model through a
//! per-type rule registry, and drives the conversion in both directions:
//!
//! - **Read**: rows from a [`RowSource`] become instances of the model
//! - **Write**: instances become rows in a [`RowSink`]
//!
//! Tokenizing, quoting and I/O are left to the row collaborators; see the
//! `sepmap-csv` crate for the delimited-text implementation.
//!
//! # Example
//!
//! ```
//! use sepmap_core::{MapError, MapperRegistry, PropertyRule, Records};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Something {
//!     a: String,
//!     b: String,
//! }
//!
//! let mut registry = MapperRegistry::new();
//! registry
//!     .register_class::<Something>()?
//!     .add_property("A", |s: &Something| s.a.clone(), |s: &mut Something, v| s.a = v)?
//!     .add_rule(
//!         "B",
//!         PropertyRule::new(|s: &Something| s.b.clone(), |s: &mut Something, v| s.b = v)
//!             .parse_with(str::to_uppercase),
//!     )?;
//!
//! let rows = Records::new(["A", "B"]).with_row(["raw", "transformed"]);
//! let items: Vec<Something> = registry.read(&mut rows.reader())?;
//! assert_eq!(
//!     items,
//!     vec![Something {
//!         a: "raw".to_string(),
//!         b: "TRANSFORMED".to_string(),
//!     }]
//! );
//! # Ok::<(), MapError>(())
//! ```

#![deny(unsafe_code)]

mod convert;
mod error;
mod pipeline;
mod registry;
mod rule;
mod rule_set;
mod source;

// === Error Types ===
pub use error::{BoxError, ConvertError, MapError};

// === Rules ===
pub use convert::{FromCell, ToCell};
pub use rule::{ColumnRule, PropertyRule};
pub use rule_set::RuleSet;

// === Registry & Pipeline ===
pub use pipeline::{read_rows, write_rows};
pub use registry::{MapperRegistry, RegisteredType};

// === Row Collaborators ===
pub use source::{Records, RecordsError, RecordsReader, RecordsWriter, RowSink, RowSource};
