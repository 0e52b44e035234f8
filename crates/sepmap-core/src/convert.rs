//! Default text conversions for property values.
//!
//! A [`PropertyRule`](crate::PropertyRule) built without a custom parse or
//! format function falls back to these traits:
//!
//! - [`FromCell`] - raw cell text to a typed value (numeric parse, date parse,
//!   passthrough for text)
//! - [`ToCell`] - typed value to its natural text representation
//!
//! Numbers, booleans and dates are parsed after trimming surrounding
//! whitespace. Text is passed through untouched. `Option<P>` maps an empty
//! (or blank) cell to `None`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::ConvertError;

/// Conversion from raw cell text into a property value.
pub trait FromCell: Sized {
    fn from_cell(text: &str) -> Result<Self, ConvertError>;
}

/// Conversion from a property value into cell text.
pub trait ToCell {
    fn to_cell(&self) -> String;
}

impl FromCell for String {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        Ok(text.to_string())
    }
}

impl ToCell for String {
    fn to_cell(&self) -> String {
        self.clone()
    }
}

impl FromCell for char {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        text.parse::<char>()
            .map_err(|e| ConvertError::parse::<char>(text, e))
    }
}

impl ToCell for char {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

impl FromCell for bool {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        let value = text.trim();
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConvertError::parse::<bool>(
                text,
                "expected 'true' or 'false'",
            ))
        }
    }
}

impl ToCell for bool {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

macro_rules! numeric_cells {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCell for $ty {
                fn from_cell(text: &str) -> Result<Self, ConvertError> {
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|e| ConvertError::parse::<$ty>(text, e))
                }
            }

            impl ToCell for $ty {
                fn to_cell(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_cells!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl FromCell for NaiveDate {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        text.trim()
            .parse::<NaiveDate>()
            .map_err(|e| ConvertError::parse::<NaiveDate>(text, e))
    }
}

impl ToCell for NaiveDate {
    fn to_cell(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl FromCell for NaiveTime {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        text.trim()
            .parse::<NaiveTime>()
            .map_err(|e| ConvertError::parse::<NaiveTime>(text, e))
    }
}

impl ToCell for NaiveTime {
    fn to_cell(&self) -> String {
        self.format("%H:%M:%S%.f").to_string()
    }
}

impl FromCell for NaiveDateTime {
    /// Accepts both `T` and space separated ISO 8601 forms.
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        let value = text.trim();
        value
            .parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|e| ConvertError::parse::<NaiveDateTime>(text, e))
    }
}

impl ToCell for NaiveDateTime {
    fn to_cell(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl FromCell for DateTime<FixedOffset> {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        let value = text.trim();
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| value.parse::<DateTime<FixedOffset>>())
            .map_err(|e| ConvertError::parse::<DateTime<FixedOffset>>(text, e))
    }
}

impl ToCell for DateTime<FixedOffset> {
    fn to_cell(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl FromCell for DateTime<Utc> {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        DateTime::<FixedOffset>::from_cell(text).map(|dt| dt.with_timezone(&Utc))
    }
}

impl ToCell for DateTime<Utc> {
    fn to_cell(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl<P: FromCell> FromCell for Option<P> {
    fn from_cell(text: &str) -> Result<Self, ConvertError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        P::from_cell(text).map(Some)
    }
}

impl<P: ToCell> ToCell for Option<P> {
    fn to_cell(&self) -> String {
        self.as_ref().map(ToCell::to_cell).unwrap_or_default()
    }
}
