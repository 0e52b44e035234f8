//! Ordered column rules for one model type.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;

use crate::convert::{FromCell, ToCell};
use crate::error::MapError;
use crate::rule::{ColumnRule, PropertyRule};

/// Column-to-property bindings for a single model type `T`.
///
/// Rules keep their insertion order; Write emits columns in that order no
/// matter how the input header of a Read was laid out. A column can be bound
/// only once per rule set.
pub struct RuleSet<T> {
    rules: Vec<(String, Box<dyn ColumnRule<T>>)>,
    index: HashMap<String, usize>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> RuleSet<T> {
    /// Bind `column` to a property through `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DuplicateColumn`] if `column` already has a rule.
    pub fn add_rule<P: 'static>(
        &mut self,
        column: impl Into<String>,
        rule: PropertyRule<T, P>,
    ) -> Result<&mut Self, MapError> {
        let column = column.into();
        if self.index.contains_key(&column) {
            return Err(MapError::DuplicateColumn {
                column,
                type_name: type_name::<T>(),
            });
        }
        tracing::trace!(
            model = type_name::<T>(),
            property = type_name::<P>(),
            column = %column,
            "added column rule"
        );
        let rule: Box<dyn ColumnRule<T>> = Box::new(rule);
        self.index.insert(column.clone(), self.rules.len());
        self.rules.push((column, rule));
        Ok(self)
    }

    /// Bind `column` using the default conversions for `P`.
    pub fn add_property<P, G, S>(
        &mut self,
        column: impl Into<String>,
        getter: G,
        setter: S,
    ) -> Result<&mut Self, MapError>
    where
        P: FromCell + ToCell + 'static,
        G: Fn(&T) -> P + Send + Sync + 'static,
        S: Fn(&mut T, P) + Send + Sync + 'static,
    {
        self.add_rule(column, PropertyRule::new(getter, setter))
    }
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Rule bound to `column`, or `None` for an unmapped column.
    pub fn get_rule(&self, column: &str) -> Option<&dyn ColumnRule<T>> {
        self.index
            .get(column)
            .map(|&idx| self.rules[idx].1.as_ref())
    }

    /// All rules in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &dyn ColumnRule<T>)> {
        self.rules
            .iter()
            .map(|(column, rule)| (column.as_str(), rule.as_ref()))
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> Vec<&str> {
        self.rules.iter().map(|(column, _)| column.as_str()).collect()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("model", &type_name::<T>())
            .field("columns", &self.columns())
            .finish()
    }
}
