//! Filter building
//!
//! Provides typed filter construction for OpenF1 queries. A field either
//! matches a scalar exactly or carries one or more comparison operators.

use crate::error::{OpenF1Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Comparison operator understood by the API as a parameter-name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Gte,
    Lte,
    Gt,
    Lt,
    Eq,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Eq => "=",
        }
    }
}

impl FromStr for Operator {
    type Err = OpenF1Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            ">=" => Ok(Operator::Gte),
            "<=" => Ok(Operator::Lte),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            "=" => Ok(Operator::Eq),
            other => Err(OpenF1Error::config(format!("unknown filter operator: {}", other))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single filter operand
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Wire representation: no locale formatting, integers stay integral,
    /// booleans become `true`/`false`
    pub fn to_param(&self) -> String {
        match self {
            Scalar::Str(s) => s.clone(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Value attached to a field: equality scalar or operator map
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(Scalar),
    Ops(BTreeMap<Operator, Scalar>),
}

impl FilterValue {
    /// Single-operator comparison
    pub fn op(operator: Operator, value: impl Into<Scalar>) -> Self {
        let mut ops = BTreeMap::new();
        ops.insert(operator, value.into());
        FilterValue::Ops(ops)
    }

    /// Exclusive (`>`/`<`) or inclusive (`>=`/`<=`) range
    pub fn range(lower: impl Into<Scalar>, upper: impl Into<Scalar>, inclusive: bool) -> Self {
        let (lo, hi) = if inclusive {
            (Operator::Gte, Operator::Lte)
        } else {
            (Operator::Gt, Operator::Lt)
        };
        let mut ops = BTreeMap::new();
        ops.insert(lo, lower.into());
        ops.insert(hi, upper.into());
        FilterValue::Ops(ops)
    }
}

macro_rules! filter_value_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

filter_value_from_scalar!(Scalar, String, &str, i64, i32, u32, f64, bool);

/// Ordered field → value map. A `None` value is an explicit "omit this
/// parameter", distinct from filtering on a falsy value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: BTreeMap<String, Option<FilterValue>>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        self.entries.insert(field.into(), Some(value.into()));
    }

    /// Insert a field whose value may be absent
    pub fn insert_opt<V: Into<FilterValue>>(&mut self, field: impl Into<String>, value: Option<V>) {
        self.entries.insert(field.into(), value.map(Into::into));
    }

    /// Chaining form of [`Filters::insert`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Chaining form of [`Filters::insert_opt`]
    pub fn with_opt<V: Into<FilterValue>>(mut self, field: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(field, value);
        self
    }

    /// Merge another filter set over this one
    pub fn extend(&mut self, other: Filters) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries.get(field).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<FilterValue>)> {
        self.entries.iter()
    }

    /// Drop every absent entry
    pub fn compact(self) -> Self {
        Self {
            entries: self.entries.into_iter().filter(|(_, v)| v.is_some()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}

/// Fluent builder for [`Filters`]
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filters: Filters,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality filter
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.filters.insert(field, FilterValue::Scalar(value.into()));
        self
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with_operator(field, Operator::Gt, value)
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with_operator(field, Operator::Gte, value)
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with_operator(field, Operator::Lt, value)
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with_operator(field, Operator::Lte, value)
    }

    /// Range filter; replaces anything already set on the field
    pub fn between(
        mut self,
        field: impl Into<String>,
        lower: impl Into<Scalar>,
        upper: impl Into<Scalar>,
        inclusive: bool,
    ) -> Self {
        self.filters.insert(field, FilterValue::range(lower, upper, inclusive));
        self
    }

    /// Set a field to an arbitrary (possibly absent) value
    pub fn set<V: Into<FilterValue>>(mut self, field: impl Into<String>, value: Option<V>) -> Self {
        self.filters.insert_opt(field, value);
        self
    }

    pub fn clear(mut self) -> Self {
        self.filters = Filters::new();
        self
    }

    pub fn build(&self) -> Filters {
        self.filters.clone()
    }

    // An operator on a field that currently holds a scalar replaces the scalar
    fn with_operator(mut self, field: impl Into<String>, operator: Operator, value: impl Into<Scalar>) -> Self {
        let field = field.into();
        let mut ops = match self.filters.entries.remove(&field) {
            Some(Some(FilterValue::Ops(ops))) => ops,
            _ => BTreeMap::new(),
        };
        ops.insert(operator, value.into());
        self.filters.entries.insert(field, Some(FilterValue::Ops(ops)));
        self
    }
}
