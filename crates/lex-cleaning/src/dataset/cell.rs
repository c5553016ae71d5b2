//! Cell values and their hashable comparison key.

use crate::utils::{format_temporal, parse_numeric_string, parse_temporal_string};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// A single value in a [`Dataset`](super::Dataset).
///
/// `Missing` is distinct from `Number(f64::NAN)` and from `Text("")`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Number(f64),
    Text(String),
    Temporal(NaiveDateTime),
    #[default]
    Missing,
}

impl Cell {
    /// Convenience constructor for text cells.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// The numeric value of this cell, if it has one.
    ///
    /// Text cells holding a plain number are read as that number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => parse_numeric_string(s),
            _ => None,
        }
    }

    /// The timestamp held by this cell, if it has one.
    ///
    /// Text cells in one of the accepted date formats are read as that date.
    pub fn as_temporal(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Temporal(dt) => Some(*dt),
            Cell::Text(s) => parse_temporal_string(s),
            _ => None,
        }
    }

    /// Key used for equality in duplicate detection and mode counting.
    pub fn key(&self) -> CellKey {
        match self {
            Cell::Number(v) => CellKey::Number(normalized_bits(*v)),
            Cell::Text(s) => CellKey::Text(s.clone()),
            Cell::Temporal(dt) => CellKey::Temporal(*dt),
            Cell::Missing => CellKey::Missing,
        }
    }
}

fn normalized_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Hashable stand-in for a [`Cell`].
///
/// Numbers compare by value, `-0.0` equals `0.0`, and all NaNs are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Number(u64),
    Text(String),
    Temporal(NaiveDateTime),
    Missing,
}

impl fmt::Display for Cell {
    /// Missing renders as an empty string, matching the CSV export.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Temporal(dt) => f.write_str(&format_temporal(dt)),
            Cell::Missing => Ok(()),
        }
    }
}

/// Serialized as the natural JSON value: number, string, formatted
/// timestamp, or `null`.
impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Cell::Number(v) if v.is_finite() => serializer.serialize_f64(*v),
            Cell::Number(_) | Cell::Missing => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Temporal(dt) => serializer.serialize_str(&format_temporal(dt)),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::Temporal(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_number() {
        assert_eq!(Cell::Number(2.5).as_number(), Some(2.5));
        assert_eq!(Cell::text(" 7 ").as_number(), Some(7.0));
        assert_eq!(Cell::text("seven").as_number(), None);
        assert_eq!(Cell::Missing.as_number(), None);
    }

    #[test]
    fn test_as_temporal() {
        assert!(Cell::text("2021-01-01").as_temporal().is_some());
        assert!(Cell::Number(20210101.0).as_temporal().is_none());
        assert!(Cell::Missing.as_temporal().is_none());
    }

    #[test]
    fn test_missing_is_not_nan_or_empty() {
        assert_ne!(Cell::Missing, Cell::Number(f64::NAN));
        assert_ne!(Cell::Missing, Cell::text(""));
        assert_ne!(Cell::Missing.key(), Cell::Number(f64::NAN).key());
        assert_ne!(Cell::Missing.key(), Cell::text("").key());
    }

    #[test]
    fn test_key_equality() {
        assert_eq!(Cell::Number(0.0).key(), Cell::Number(-0.0).key());
        assert_eq!(Cell::Number(f64::NAN).key(), Cell::Number(-f64::NAN).key());
        assert_eq!(Cell::Missing.key(), Cell::Missing.key());
        assert_ne!(Cell::Number(1.0).key(), Cell::text("1").key());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(Cell::text("abc").to_string(), "abc");
    }

    #[test]
    fn test_serialize() {
        let cells = vec![
            Cell::Number(1.5),
            Cell::text("x"),
            Cell::Missing,
            Cell::Number(f64::NAN),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[1.5,"x",null,null]"#);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Cell::from(Some(1.0)), Cell::Number(1.0));
        assert_eq!(Cell::from(None::<f64>), Cell::Missing);
        assert_eq!(Cell::from(Some("a")), Cell::text("a"));
    }
}
