//! Registry of rule sets keyed by model type.
//!
//! The registry is an ordinary value: construct it, register the model types,
//! then run any number of Read and Write calls against it. Registration needs
//! `&mut self`, so rule sets cannot change underneath an in-flight call, and a
//! shared `&MapperRegistry` can drive conversions from several threads.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::error::MapError;
use crate::pipeline::{read_rows, write_rows};
use crate::rule_set::RuleSet;
use crate::source::{RowSink, RowSource};

/// Type-erased view of a `RuleSet<T>`.
trait ErasedRuleSet: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn model_name(&self) -> &'static str;
    fn column_names(&self) -> Vec<&str>;
}

impl<T: 'static> ErasedRuleSet for RuleSet<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn model_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns()
    }
}

/// Summary of one registered model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredType<'a> {
    pub type_name: &'static str,
    pub columns: Vec<&'a str>,
}

/// Maps each registered model type to its [`RuleSet`].
///
/// Lookup is by exact type; a wrapper or newtype around a registered model
/// has to be registered on its own.
#[derive(Default)]
pub struct MapperRegistry {
    rule_sets: HashMap<TypeId, Box<dyn ErasedRuleSet>>,
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new, empty rule set for `T`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnregisteredType`] if the stored rule set cannot be
    /// read back as a `RuleSet<T>`.
    pub fn register_class<T: 'static>(&mut self) -> Result<&mut RuleSet<T>, MapError> {
        let entry = match self.rule_sets.entry(TypeId::of::<T>()) {
            Entry::Occupied(mut entry) => {
                tracing::warn!(
                    model = type_name::<T>(),
                    "replacing existing rule set; previous rules are discarded"
                );
                entry.insert(Box::new(RuleSet::<T>::new()));
                entry
            }
            Entry::Vacant(entry) => {
                tracing::debug!(model = type_name::<T>(), "registered model type");
                entry.insert_entry(Box::new(RuleSet::<T>::new()))
            }
        };

        entry
            .into_mut()
            .as_any_mut()
            .downcast_mut::<RuleSet<T>>()
            .ok_or_else(MapError::unregistered::<T>)
    }

    /// Drop the rule set for `T`. Unknown types are ignored.
    pub fn unregister_class<T: 'static>(&mut self) {
        if self.rule_sets.remove(&TypeId::of::<T>()).is_some() {
            tracing::debug!(model = type_name::<T>(), "unregistered model type");
        }
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.rule_sets.contains_key(&TypeId::of::<T>())
    }

    /// Rule set registered for `T`.
    pub fn rule_set<T: 'static>(&self) -> Option<&RuleSet<T>> {
        self.rule_sets
            .get(&TypeId::of::<T>())
            .and_then(|rules| rules.as_any().downcast_ref::<RuleSet<T>>())
    }

    /// Mutable access to the rule set registered for `T`.
    pub fn rule_set_mut<T: 'static>(&mut self) -> Option<&mut RuleSet<T>> {
        self.rule_sets
            .get_mut(&TypeId::of::<T>())
            .and_then(|rules| rules.as_any_mut().downcast_mut::<RuleSet<T>>())
    }

    /// Registered model types and their columns, sorted by type name.
    pub fn registered_types(&self) -> Vec<RegisteredType<'_>> {
        let mut types: Vec<RegisteredType<'_>> = self
            .rule_sets
            .values()
            .map(|rules| RegisteredType {
                type_name: rules.model_name(),
                columns: rules.column_names(),
            })
            .collect();
        types.sort_by(|a, b| a.type_name.cmp(b.type_name));
        types
    }

    /// Convert every row of `source` into a `T`.
    ///
    /// # Errors
    ///
    /// - [`MapError::UnregisteredType`] if `T` has no rule set
    /// - [`MapError::Conversion`] on the first cell that fails to convert
    /// - [`MapError::Source`] if the row source fails
    pub fn read<T, S>(&self, source: &mut S) -> Result<Vec<T>, MapError>
    where
        T: Default + 'static,
        S: RowSource + ?Sized,
    {
        let rules = self.require::<T>()?;
        read_rows(rules, source)
    }

    /// Write `instances` into `sink` and return the sink's finished output.
    ///
    /// # Errors
    ///
    /// - [`MapError::UnregisteredType`] if `T` has no rule set
    /// - [`MapError::Conversion`] on the first value that fails to render
    /// - [`MapError::Sink`] if the row sink fails
    pub fn write<T, K>(&self, instances: &[T], mut sink: K) -> Result<K::Output, MapError>
    where
        T: 'static,
        K: RowSink,
    {
        let rules = self.require::<T>()?;
        write_rows(rules, instances, &mut sink)?;
        sink.finish().map_err(MapError::row_sink)
    }

    fn require<T: 'static>(&self) -> Result<&RuleSet<T>, MapError> {
        self.rule_set::<T>().ok_or_else(MapError::unregistered::<T>)
    }
}

impl fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
