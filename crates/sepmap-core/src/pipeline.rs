//! Read and Write conversion driven by a [`RuleSet`].
//!
//! Both directions are fail-fast: the first cell that cannot be converted
//! aborts the call, and no partially built result is returned.
//!
//! # Read
//!
//! 1. Construct `T::default()` for every input row
//! 2. Apply the rule of every header column that has one; skip the rest
//! 3. Collect instances in input order
//!
//! # Write
//!
//! 1. Emit the header once, in rule registration order
//! 2. Render every cell of an instance before handing the row to the sink

use std::any::type_name;

use crate::error::MapError;
use crate::rule_set::RuleSet;
use crate::source::{RowSink, RowSource};

/// Convert every row of `source` into a `T`.
///
/// Columns without a rule are ignored. Registered columns missing from a
/// row keep the value from `T::default()`.
pub fn read_rows<T, S>(rules: &RuleSet<T>, source: &mut S) -> Result<Vec<T>, MapError>
where
    T: Default,
    S: RowSource + ?Sized,
{
    let mut instances = Vec::new();
    let mut row = 0usize;

    while source
        .next_row()
        .map_err(|e| MapError::row_source(row, e))?
    {
        let mut instance = T::default();
        for column in source.header() {
            let Some(rule) = rules.get_rule(column) else {
                tracing::trace!(column = %column, row, "skipping unmapped column");
                continue;
            };
            let Some(text) = source.cell(column) else {
                continue;
            };
            rule.set_value(&mut instance, text)
                .map_err(|e| MapError::conversion::<T>(column, row, e))?;
        }
        instances.push(instance);
        row += 1;
    }

    tracing::debug!(
        model = type_name::<T>(),
        rows = instances.len(),
        "read rows"
    );
    Ok(instances)
}

/// Render `instances` into `sink`, one row per instance.
pub fn write_rows<T, K>(rules: &RuleSet<T>, instances: &[T], sink: &mut K) -> Result<(), MapError>
where
    K: RowSink + ?Sized,
{
    let columns = rules.columns();
    sink.write_header(&columns).map_err(MapError::row_sink)?;

    let mut cells = Vec::with_capacity(columns.len());
    for (row, instance) in instances.iter().enumerate() {
        cells.clear();
        for (column, rule) in rules.rules() {
            let text = rule
                .get_value(instance)
                .map_err(|e| MapError::conversion::<T>(column, row, e))?;
            cells.push(text);
        }

        sink.begin_row().map_err(MapError::row_sink)?;
        for (column, text) in columns.iter().zip(&cells) {
            sink.set_cell(column, text).map_err(MapError::row_sink)?;
        }
        sink.end_row().map_err(MapError::row_sink)?;
    }

    tracing::debug!(
        model = type_name::<T>(),
        rows = instances.len(),
        columns = columns.len(),
        "wrote rows"
    );
    Ok(())
}
