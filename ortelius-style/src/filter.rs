//! Filter expressions selecting the features a style layer renders.

use std::cmp::Ordering;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FilterParseError;
use crate::feature::FeatureProperties;
use crate::value::PropertyValue;

/// Key a comparison filter reads from a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKey {
    /// A property of the feature, looked up by name.
    Property(String),
    /// The reserved `$type` key: the geometry type of the feature.
    GeometryType,
}

impl FilterKey {
    fn parse(json: &serde_json::Value) -> Result<Self, FilterParseError> {
        match json {
            serde_json::Value::String(key) if key == "$type" => Ok(FilterKey::GeometryType),
            serde_json::Value::String(key) => Ok(FilterKey::Property(key.clone())),
            other => Err(FilterParseError::InvalidLiteral(other.to_string())),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            FilterKey::Property(key) => key,
            FilterKey::GeometryType => "$type",
        }
    }
}

/// A boolean predicate over feature properties and geometry type.
///
/// Filters are parsed once from a JSON style document with [`Filter::parse`]
/// and evaluated once per candidate feature with [`Filter::evaluate`]. A
/// parsed filter is immutable and holds no evaluation state, so a single
/// instance can be evaluated concurrently from multiple threads.
///
/// Malformed expressions are rejected at parse time; evaluation is total and
/// always produces a boolean, including for features with no properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `["==", key, value]`: the key's value equals the literal.
    Equal(FilterKey, PropertyValue),
    /// `["!=", key, value]`: negation of `==`; true when the key is absent.
    NotEqual(FilterKey, PropertyValue),
    /// `["<", key, value]`: the key's value is ordered before the literal.
    LessThan(FilterKey, PropertyValue),
    /// `["<=", key, value]`.
    LessThanOrEqual(FilterKey, PropertyValue),
    /// `[">", key, value]`.
    GreaterThan(FilterKey, PropertyValue),
    /// `[">=", key, value]`.
    GreaterThanOrEqual(FilterKey, PropertyValue),
    /// `["in", key, values...]`: the key's value equals any of the literals.
    In(FilterKey, Vec<PropertyValue>),
    /// `["!in", key, values...]`: negation of `in`.
    NotIn(FilterKey, Vec<PropertyValue>),
    /// `["all", filters...]`: every sub-filter holds; vacuously true.
    All(Vec<Filter>),
    /// `["any", filters...]`: at least one sub-filter holds; vacuously false.
    Any(Vec<Filter>),
    /// `["none", filters...]`: no sub-filter holds; vacuously true.
    None(Vec<Filter>),
    /// `["has", key]`: the feature has a value for the key.
    Has(String),
    /// `["!has", key]`: negation of `has`.
    NotHas(String),
}

impl Filter {
    /// Parses a filter from a style document node.
    pub fn parse(json: &serde_json::Value) -> Result<Filter, FilterParseError> {
        let serde_json::Value::Array(items) = json else {
            return Err(FilterParseError::NotAnArray(json.to_string()));
        };
        let Some(serde_json::Value::String(op)) = items.first() else {
            return Err(FilterParseError::MissingOperator);
        };
        let args = &items[1..];

        match op.as_str() {
            "==" => comparison_args("==", args).map(|(k, v)| Filter::Equal(k, v)),
            "!=" => comparison_args("!=", args).map(|(k, v)| Filter::NotEqual(k, v)),
            "<" => comparison_args("<", args).map(|(k, v)| Filter::LessThan(k, v)),
            "<=" => comparison_args("<=", args).map(|(k, v)| Filter::LessThanOrEqual(k, v)),
            ">" => comparison_args(">", args).map(|(k, v)| Filter::GreaterThan(k, v)),
            ">=" => comparison_args(">=", args).map(|(k, v)| Filter::GreaterThanOrEqual(k, v)),
            "in" => set_args("in", args).map(|(k, vs)| Filter::In(k, vs)),
            "!in" => set_args("!in", args).map(|(k, vs)| Filter::NotIn(k, vs)),
            "all" => sub_filters(args).map(Filter::All),
            "any" => sub_filters(args).map(Filter::Any),
            "none" => sub_filters(args).map(Filter::None),
            "has" => key_arg("has", args).map(Filter::Has),
            "!has" => key_arg("!has", args).map(Filter::NotHas),
            other => Err(FilterParseError::UnknownOperator(other.to_string())),
        }
    }

    /// Evaluates the filter against a feature.
    ///
    /// Never fails for a parsed filter; absent properties make every
    /// comparison false, which makes the negated operators true.
    pub fn evaluate<F: FeatureProperties + ?Sized>(&self, feature: &F) -> bool {
        match self {
            Filter::Equal(key, value) => compare(key, feature, |v| v.eq_value(value)),
            Filter::NotEqual(key, value) => !compare(key, feature, |v| v.eq_value(value)),
            Filter::LessThan(key, value) => ordered(key, value, feature, Ordering::is_lt),
            Filter::LessThanOrEqual(key, value) => ordered(key, value, feature, Ordering::is_le),
            Filter::GreaterThan(key, value) => ordered(key, value, feature, Ordering::is_gt),
            Filter::GreaterThanOrEqual(key, value) => ordered(key, value, feature, Ordering::is_ge),
            Filter::In(key, values) => {
                compare(key, feature, |v| values.iter().any(|item| v.eq_value(item)))
            }
            Filter::NotIn(key, values) => {
                !compare(key, feature, |v| values.iter().any(|item| v.eq_value(item)))
            }
            Filter::All(filters) => filters.iter().all(|filter| filter.evaluate(feature)),
            Filter::Any(filters) => filters.iter().any(|filter| filter.evaluate(feature)),
            Filter::None(filters) => !filters.iter().any(|filter| filter.evaluate(feature)),
            Filter::Has(key) => feature.property(key).is_some(),
            Filter::NotHas(key) => feature.property(key).is_none(),
        }
    }

    /// Converts the filter back to its style document representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Filter::Equal(k, v) => comparison_json("==", k, v),
            Filter::NotEqual(k, v) => comparison_json("!=", k, v),
            Filter::LessThan(k, v) => comparison_json("<", k, v),
            Filter::LessThanOrEqual(k, v) => comparison_json("<=", k, v),
            Filter::GreaterThan(k, v) => comparison_json(">", k, v),
            Filter::GreaterThanOrEqual(k, v) => comparison_json(">=", k, v),
            Filter::In(k, vs) => set_json("in", k, vs),
            Filter::NotIn(k, vs) => set_json("!in", k, vs),
            Filter::All(fs) => compound_json("all", fs),
            Filter::Any(fs) => compound_json("any", fs),
            Filter::None(fs) => compound_json("none", fs),
            Filter::Has(k) => serde_json::Value::Array(vec!["has".into(), k.clone().into()]),
            Filter::NotHas(k) => serde_json::Value::Array(vec!["!has".into(), k.clone().into()]),
        }
    }
}

fn key_value<F: FeatureProperties + ?Sized>(key: &FilterKey, feature: &F) -> Option<PropertyValue> {
    match key {
        FilterKey::Property(key) => feature.property(key),
        FilterKey::GeometryType => Some(PropertyValue::String(
            feature.geometry_type().as_str().to_string(),
        )),
    }
}

fn compare<F, P>(key: &FilterKey, feature: &F, predicate: P) -> bool
where
    F: FeatureProperties + ?Sized,
    P: FnOnce(&PropertyValue) -> bool,
{
    key_value(key, feature).is_some_and(|value| predicate(&value))
}

fn ordered<F, P>(key: &FilterKey, literal: &PropertyValue, feature: &F, predicate: P) -> bool
where
    F: FeatureProperties + ?Sized,
    P: FnOnce(Ordering) -> bool,
{
    key_value(key, feature)
        .and_then(|value| value.partial_cmp_value(literal))
        .is_some_and(predicate)
}

fn parse_literal(json: &serde_json::Value) -> Result<PropertyValue, FilterParseError> {
    match json {
        serde_json::Value::String(v) => Ok(PropertyValue::String(v.clone())),
        serde_json::Value::Bool(v) => Ok(PropertyValue::Bool(*v)),
        serde_json::Value::Number(v) => {
            if let Some(v) = v.as_i64() {
                Ok(PropertyValue::Int64(v))
            } else if let Some(v) = v.as_u64() {
                Ok(PropertyValue::Uint64(v))
            } else if let Some(v) = v.as_f64() {
                Ok(PropertyValue::Double(v))
            } else {
                Err(FilterParseError::InvalidLiteral(v.to_string()))
            }
        }
        other => Err(FilterParseError::InvalidLiteral(other.to_string())),
    }
}

fn comparison_args(
    op: &'static str,
    args: &[serde_json::Value],
) -> Result<(FilterKey, PropertyValue), FilterParseError> {
    let [key, value] = args else {
        return Err(FilterParseError::InvalidArguments(op));
    };
    Ok((FilterKey::parse(key)?, parse_literal(value)?))
}

fn set_args(
    op: &'static str,
    args: &[serde_json::Value],
) -> Result<(FilterKey, Vec<PropertyValue>), FilterParseError> {
    let Some((key, values)) = args.split_first() else {
        return Err(FilterParseError::InvalidArguments(op));
    };
    let values = values
        .iter()
        .map(parse_literal)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((FilterKey::parse(key)?, values))
}

fn sub_filters(args: &[serde_json::Value]) -> Result<Vec<Filter>, FilterParseError> {
    args.iter().map(Filter::parse).collect()
}

fn key_arg(op: &'static str, args: &[serde_json::Value]) -> Result<String, FilterParseError> {
    let [serde_json::Value::String(key)] = args else {
        return Err(FilterParseError::InvalidArguments(op));
    };
    Ok(key.clone())
}

fn literal_json(value: &PropertyValue) -> serde_json::Value {
    match value {
        PropertyValue::String(v) => v.clone().into(),
        PropertyValue::Float(v) => (*v as f64).into(),
        PropertyValue::Double(v) => (*v).into(),
        PropertyValue::Int64(v) => (*v).into(),
        PropertyValue::Uint64(v) => (*v).into(),
        PropertyValue::Bool(v) => (*v).into(),
        PropertyValue::Unknown => serde_json::Value::Null,
    }
}

fn comparison_json(op: &str, key: &FilterKey, value: &PropertyValue) -> serde_json::Value {
    serde_json::Value::Array(vec![op.into(), key.as_str().into(), literal_json(value)])
}

fn set_json(op: &str, key: &FilterKey, values: &[PropertyValue]) -> serde_json::Value {
    let mut items = vec![op.into(), key.as_str().into()];
    items.extend(values.iter().map(literal_json));
    serde_json::Value::Array(items)
}

fn compound_json(op: &str, filters: &[Filter]) -> serde_json::Value {
    let mut items = vec![op.into()];
    items.extend(filters.iter().map(Filter::to_json));
    serde_json::Value::Array(items)
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Filter::parse(&json).map_err(D::Error::custom)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
