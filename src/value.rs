//! Value kinds carried by annotated record fields.
//!
//! A field binding declares exactly one [`FieldKind`]. Assignments are
//! checked against that kind without any widening or coercion; turning
//! argument text into a value is an explicit step performed by the caller
//! through [`FieldKind::parse`].

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;

use serde::Serialize;
use thiserror::Error;

/// The declared kind of a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// Unsigned 64-bit integer.
    Unsigned,
    /// 64-bit floating point number.
    Float,
    /// Boolean switch.
    Flag,
}

impl FieldKind {
    /// Parse `token` into a value of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineconf::{FieldKind, FieldValue};
    ///
    /// let value = FieldKind::Unsigned.parse("123").expect("valid port");
    /// assert_eq!(value, FieldValue::Unsigned(123));
    /// assert!(FieldKind::Unsigned.parse("-1").is_err());
    /// ```
    pub fn parse(self, token: &str) -> Result<FieldValue, ParseValueError> {
        let value = match self {
            Self::Text => FieldValue::Text(token.to_owned()),
            Self::Integer => FieldValue::Integer(token.parse()?),
            Self::Unsigned => FieldValue::Unsigned(token.parse()?),
            Self::Float => FieldValue::Float(token.parse()?),
            Self::Flag => FieldValue::Flag(token.parse()?),
        };
        Ok(value)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Unsigned => "unsigned integer",
            Self::Float => "float",
            Self::Flag => "flag",
        };
        f.write_str(name)
    }
}

/// Failure to parse argument text with [`FieldKind::parse`].
#[derive(Debug, Error)]
pub enum ParseValueError {
    #[error(transparent)]
    Int(#[from] ParseIntError),
    #[error(transparent)]
    Float(#[from] ParseFloatError),
    #[error(transparent)]
    Bool(#[from] ParseBoolError),
}

/// A dynamically kinded value read from or written to a bound field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Flag(bool),
}

impl FieldValue {
    /// The kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Unsigned(_) => FieldKind::Unsigned,
            Self::Float(_) => FieldKind::Float,
            Self::Flag(_) => FieldKind::Flag,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.write_str(v),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Flag(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// A Rust type that may back an annotated field.
///
/// `Option<V>` shares the kind of `V` and reads as absent until assigned.
pub trait FieldType: Sized {
    /// Kind every value assigned to this type must have.
    const KIND: FieldKind;

    /// Current value, or `None` when unset.
    fn to_value(&self) -> Option<FieldValue>;

    /// Convert `value` into this type.
    ///
    /// Returns the value unchanged when its kind does not match
    /// [`Self::KIND`].
    fn from_value(value: FieldValue) -> Result<Self, FieldValue>;
}

macro_rules! impl_field_type {
    ($ty:ty, $variant:ident, |$this:ident| $read:expr) => {
        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::$variant;

            fn to_value(&self) -> Option<FieldValue> {
                let $this = self;
                Some(FieldValue::$variant($read))
            }

            fn from_value(value: FieldValue) -> Result<Self, FieldValue> {
                match value {
                    FieldValue::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_field_type!(String, Text, |s| s.clone());
impl_field_type!(i64, Integer, |v| *v);
impl_field_type!(u64, Unsigned, |v| *v);
impl_field_type!(f64, Float, |v| *v);
impl_field_type!(bool, Flag, |v| *v);

impl<V: FieldType> FieldType for Option<V> {
    const KIND: FieldKind = V::KIND;

    fn to_value(&self) -> Option<FieldValue> {
        self.as_ref().and_then(FieldType::to_value)
    }

    fn from_value(value: FieldValue) -> Result<Self, FieldValue> {
        V::from_value(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::text(FieldKind::Text, "/var/log/chrony", FieldValue::Text("/var/log/chrony".into()))]
    #[case::integer(FieldKind::Integer, "-12", FieldValue::Integer(-12))]
    #[case::unsigned(FieldKind::Unsigned, "323", FieldValue::Unsigned(323))]
    #[case::float(FieldKind::Float, "100.0", FieldValue::Float(100.0))]
    #[case::flag(FieldKind::Flag, "true", FieldValue::Flag(true))]
    fn parses_token_with_kind(
        #[case] kind: FieldKind,
        #[case] token: &str,
        #[case] expected: FieldValue,
    ) {
        let value = kind
            .parse(token)
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(value, expected);
        assert_eq!(value.kind(), kind);
    }

    #[rstest]
    #[case::integer(FieldKind::Integer, "ten")]
    #[case::unsigned(FieldKind::Unsigned, "-1")]
    #[case::float(FieldKind::Float, "fast")]
    #[case::flag(FieldKind::Flag, "yes")]
    fn rejects_malformed_tokens(#[case] kind: FieldKind, #[case] token: &str) {
        assert!(kind.parse(token).is_err());
    }

    #[test]
    fn from_value_returns_mismatched_value() {
        let value = FieldValue::Unsigned(1);
        assert_eq!(String::from_value(value.clone()), Err(value));
    }

    #[test]
    fn optional_types_share_inner_kind() {
        assert_eq!(<Option<String> as FieldType>::KIND, FieldKind::Text);
        assert_eq!(None::<u64>.to_value(), None);
        assert_eq!(Some(7_u64).to_value(), Some(FieldValue::Unsigned(7)));
    }

    #[test]
    fn serialises_without_tags() {
        let json = serde_json::to_string(&FieldValue::from("abc"))
            .unwrap_or_else(|e| panic!("serialisation failed: {e}"));
        assert_eq!(json, "\"abc\"");
    }
}
