use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Value of a single feature property.
///
/// The variants preserve the encoding used by the source data. The derived
/// `PartialEq` is structural; filter comparisons go through
/// [`PropertyValue::eq_value`] and [`PropertyValue::partial_cmp_value`], which
/// compare numeric variants by mathematical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// String value.
    String(String),
    /// 32-bit float value.
    Float(f32),
    /// 64-bit float value.
    Double(f64),
    /// Signed integer value.
    Int64(i64),
    /// Unsigned integer value.
    Uint64(u64),
    /// Boolean value.
    Bool(bool),
    /// Value of a type that could not be read from the source data.
    Unknown,
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::String(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Double(v) => write!(f, "{v}"),
            PropertyValue::Int64(v) => write!(f, "{v}"),
            PropertyValue::Uint64(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Unknown => write!(f, "<NONE>"),
        }
    }
}

impl PropertyValue {
    /// Value-based equality.
    ///
    /// Numeric variants holding the mathematically same value are equal to
    /// each other regardless of encoding. A string is never equal to a number
    /// or boolean, a boolean is never equal to a number, and `Unknown` is
    /// equal to nothing, including itself.
    pub fn eq_value(&self, other: &PropertyValue) -> bool {
        use PropertyValue::*;

        match (self, other) {
            (Unknown, _) | (_, Unknown) => false,
            (String(a), String(b)) => a == b,
            (String(_), _) | (_, String(_)) => false,
            (Bool(a), Bool(b)) => a == b,
            (Bool(_), _) | (_, Bool(_)) => false,
            (Int64(a), Int64(b)) => a == b,
            (Uint64(a), Uint64(b)) => a == b,
            (Int64(a), Uint64(b)) | (Uint64(b), Int64(a)) => *a >= 0 && *a as u64 == *b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Cross-encoding ordering.
    ///
    /// Defined between any two numeric values and between two strings;
    /// `None` for every other pair, and for NaN operands.
    pub fn partial_cmp_value(&self, other: &PropertyValue) -> Option<Ordering> {
        use PropertyValue::*;

        match (self, other) {
            (String(a), String(b)) => Some(a.cmp(b)),
            (String(_), _) | (_, String(_)) => None,
            (Bool(_), _) | (_, Bool(_)) => None,
            (Unknown, _) | (_, Unknown) => None,
            (Int64(a), Int64(b)) => Some(a.cmp(b)),
            (Uint64(a), Uint64(b)) => Some(a.cmp(b)),
            (Int64(a), Uint64(b)) => {
                if *a < 0 {
                    Some(Ordering::Less)
                } else {
                    Some((*a as u64).cmp(b))
                }
            }
            (Uint64(a), Int64(b)) => {
                if *b < 0 {
                    Some(Ordering::Greater)
                } else {
                    Some(a.cmp(&(*b as u64)))
                }
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v as f64),
            PropertyValue::Double(v) => Some(*v),
            PropertyValue::Int64(v) => Some(*v as f64),
            PropertyValue::Uint64(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int64(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::Uint64(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_equality_ignores_encoding() {
        let zero = [
            PropertyValue::Int64(0),
            PropertyValue::Uint64(0),
            PropertyValue::Double(0.0),
            PropertyValue::Float(0.0),
        ];
        for a in &zero {
            for b in &zero {
                assert!(a.eq_value(b), "{a:?} should equal {b:?}");
            }
        }

        assert!(!PropertyValue::Int64(0).eq_value(&PropertyValue::Int64(1)));
        assert!(!PropertyValue::Uint64(1).eq_value(&PropertyValue::Double(0.5)));
    }

    #[test]
    fn strings_and_booleans_never_equal_numbers() {
        let zero = PropertyValue::Int64(0);
        assert!(!zero.eq_value(&PropertyValue::String("0".into())));
        assert!(!zero.eq_value(&PropertyValue::Bool(false)));
        assert!(!PropertyValue::Bool(true).eq_value(&PropertyValue::Int64(1)));
        assert!(!PropertyValue::String("true".into()).eq_value(&PropertyValue::Bool(true)));
    }

    #[test]
    fn unknown_equals_nothing() {
        assert!(!PropertyValue::Unknown.eq_value(&PropertyValue::Unknown));
        assert!(!PropertyValue::Unknown.eq_value(&PropertyValue::Int64(0)));
    }

    #[test]
    fn signed_unsigned_comparison_is_exact_at_the_boundary() {
        let max = u64::MAX;
        assert!(!PropertyValue::Int64(-1).eq_value(&PropertyValue::Uint64(max)));
        assert_eq!(
            PropertyValue::Int64(-1).partial_cmp_value(&PropertyValue::Uint64(max)),
            Some(Ordering::Less)
        );
        assert_eq!(
            PropertyValue::Uint64(max).partial_cmp_value(&PropertyValue::Int64(-1)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn ordering_is_undefined_across_kinds() {
        assert_eq!(
            PropertyValue::String("1".into()).partial_cmp_value(&PropertyValue::Int64(1)),
            None
        );
        assert_eq!(
            PropertyValue::Bool(true).partial_cmp_value(&PropertyValue::Bool(false)),
            None
        );
        assert_eq!(
            PropertyValue::Double(f64::NAN).partial_cmp_value(&PropertyValue::Double(0.0)),
            None
        );
    }

    #[test]
    fn numeric_ordering_spans_encodings() {
        assert_eq!(
            PropertyValue::Int64(2).partial_cmp_value(&PropertyValue::Double(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            PropertyValue::Float(3.0).partial_cmp_value(&PropertyValue::Uint64(2)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            PropertyValue::Uint64(7).partial_cmp_value(&PropertyValue::Int64(7)),
            Some(Ordering::Equal)
        );
    }
}
