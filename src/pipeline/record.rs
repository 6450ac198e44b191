//! The record abstraction the pipeline stages operate on.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A field value extracted from a record for searching and sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// A numeric field, compared numerically.
    Number(Decimal),
    /// A text field, compared case-folded first.
    Text(String),
    /// The record has no value for the field.
    Missing,
}

impl FieldValue {
    /// Returns the value as searched by substring filters.
    ///
    /// Missing values have no text and never match a non-empty needle.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Missing => None,
        }
    }

    /// Returns true if the record has no value for the field.
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Ascending order between two present values.
    ///
    /// Numbers compare numerically; text compares case-folded, then
    /// exactly, so `"alice" < "Bob" < "bob"`. Numbers sort before text.
    pub(crate) fn cmp_present(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
            // Missing is ordered by the caller.
            (FieldValue::Missing, _) | (_, FieldValue::Missing) => Ordering::Equal,
        }
    }
}

impl From<Option<Decimal>> for FieldValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Number)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Text)
    }
}

/// A row the pipeline can filter, search and sort.
///
/// Implementors designate one timestamp for time-window filtering and map
/// field names to values for search and sort. Unknown names yield
/// [`FieldValue::Missing`].
///
/// # Example
///
/// ```
/// use attendance_engine::pipeline::{FieldValue, Record};
/// use chrono::NaiveDateTime;
///
/// struct Room {
///     name: String,
/// }
///
/// impl Record for Room {
///     fn timestamp(&self) -> Option<NaiveDateTime> {
///         None
///     }
///
///     fn field(&self, name: &str) -> FieldValue {
///         match name {
///             "name" => FieldValue::Text(self.name.clone()),
///             _ => FieldValue::Missing,
///         }
///     }
/// }
///
/// let room = Room { name: "Atrium".to_string() };
/// assert_eq!(room.field("name"), FieldValue::Text("Atrium".to_string()));
/// assert!(room.field("floor").is_missing());
/// ```
pub trait Record {
    /// The timestamp used by time-window filters.
    fn timestamp(&self) -> Option<NaiveDateTime>;

    /// The value of the named field.
    fn field(&self, name: &str) -> FieldValue;
}

impl<T: Record + ?Sized> Record for &T {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        (**self).timestamp()
    }

    fn field(&self, name: &str) -> FieldValue {
        (**self).field(name)
    }
}
