//! Per-property conversion rules.
//!
//! A [`PropertyRule`] binds one property of type `P` on a model `T` to the
//! text of a single column. Rules of different property types are stored side
//! by side through the [`ColumnRule`] trait, which only speaks text and hides
//! `P` from the rule set.

use std::any::type_name;
use std::fmt;

use crate::convert::{FromCell, ToCell};
use crate::error::{BoxError, ConvertError};

type Getter<T, P> = Box<dyn Fn(&T) -> P + Send + Sync>;
type Setter<T, P> = Box<dyn Fn(&mut T, P) + Send + Sync>;
type ParseFn<P> = Box<dyn Fn(&str) -> Result<P, ConvertError> + Send + Sync>;
type FormatFn<P> = Box<dyn Fn(&P) -> Result<String, ConvertError> + Send + Sync>;

/// Property-type-agnostic view of a rule, as stored in a rule set.
pub trait ColumnRule<T>: Send + Sync {
    /// Read the property from `instance` and render it as cell text.
    fn get_value(&self, instance: &T) -> Result<String, ConvertError>;

    /// Convert `text` and assign it to the property on `instance`.
    fn set_value(&self, instance: &mut T, text: &str) -> Result<(), ConvertError>;

    /// Name of the bound property type, for diagnostics.
    fn property_type(&self) -> &'static str;
}

/// Bidirectional conversion contract for one property.
///
/// The getter and setter are captured once at construction. Parse and format
/// functions default to [`FromCell`] and [`ToCell`] and can be replaced with
/// [`parse_with`](Self::parse_with) and [`format_with`](Self::format_with).
///
/// ```
/// use sepmap_core::{ColumnRule, PropertyRule};
///
/// #[derive(Default)]
/// struct Something {
///     name: String,
/// }
///
/// let rule = PropertyRule::new(|s: &Something| s.name.clone(), |s: &mut Something, v| s.name = v)
///     .parse_with(str::to_uppercase);
///
/// let mut item = Something::default();
/// rule.set_value(&mut item, "raw").unwrap();
/// assert_eq!(item.name, "RAW");
/// assert_eq!(rule.get_value(&item).unwrap(), "RAW");
/// ```
pub struct PropertyRule<T, P> {
    getter: Getter<T, P>,
    setter: Setter<T, P>,
    parse: ParseFn<P>,
    format: FormatFn<P>,
}

impl<T, P> PropertyRule<T, P>
where
    P: FromCell + ToCell + 'static,
{
    /// Create a rule that uses the default conversions for `P`.
    pub fn new<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&T) -> P + Send + Sync + 'static,
        S: Fn(&mut T, P) + Send + Sync + 'static,
    {
        Self::with_converters(getter, setter, P::from_cell, |value: &P| {
            Ok(value.to_cell())
        })
    }
}

impl<T, P: 'static> PropertyRule<T, P> {
    /// Create a rule with explicit converters; `P` needs no default conversions.
    pub fn with_converters<G, S, F, W>(getter: G, setter: S, parse: F, format: W) -> Self
    where
        G: Fn(&T) -> P + Send + Sync + 'static,
        S: Fn(&mut T, P) + Send + Sync + 'static,
        F: Fn(&str) -> Result<P, ConvertError> + Send + Sync + 'static,
        W: Fn(&P) -> Result<String, ConvertError> + Send + Sync + 'static,
    {
        Self {
            getter: Box::new(getter),
            setter: Box::new(setter),
            parse: Box::new(parse),
            format: Box::new(format),
        }
    }

    /// Replace the text-to-property conversion.
    #[must_use]
    pub fn parse_with<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> P + Send + Sync + 'static,
    {
        self.parse = Box::new(move |text: &str| Ok(parse(text)));
        self
    }

    /// Replace the text-to-property conversion with a fallible one.
    #[must_use]
    pub fn try_parse_with<F, E>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<P, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.parse = Box::new(move |text: &str| parse(text).map_err(ConvertError::custom));
        self
    }

    /// Replace the property-to-text conversion.
    #[must_use]
    pub fn format_with<W>(mut self, format: W) -> Self
    where
        W: Fn(&P) -> String + Send + Sync + 'static,
    {
        self.format = Box::new(move |value: &P| Ok(format(value)));
        self
    }

    /// Replace the property-to-text conversion with a fallible one.
    #[must_use]
    pub fn try_format_with<W, E>(mut self, format: W) -> Self
    where
        W: Fn(&P) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.format = Box::new(move |value: &P| format(value).map_err(ConvertError::custom));
        self
    }
}

impl<T, P> ColumnRule<T> for PropertyRule<T, P> {
    fn get_value(&self, instance: &T) -> Result<String, ConvertError> {
        let value = (self.getter)(instance);
        (self.format)(&value)
    }

    fn set_value(&self, instance: &mut T, text: &str) -> Result<(), ConvertError> {
        let value = (self.parse)(text)?;
        (self.setter)(instance, value);
        Ok(())
    }

    fn property_type(&self) -> &'static str {
        type_name::<P>()
    }
}

impl<T, P> fmt::Debug for PropertyRule<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRule")
            .field("model", &type_name::<T>())
            .field("property", &type_name::<P>())
            .finish_non_exhaustive()
    }
}
