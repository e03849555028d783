//! Dynamically typed attribute values.
//!
//! Attribute sets in change records have no fixed shape, so every value is
//! held in [`AttrValue`]. Equality is structural and must be checked before a
//! value is rendered; the rendering is for humans and is never parsed back.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name to value, ordered by name.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// A single attribute value.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum AttrValue {
    /// Absent or unknown value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value, kept exactly as decoded.
    Number(serde_json::Number),
    /// String value.
    String(String),
    /// Ordered list (also used for sets and tuples).
    List(Vec<AttrValue>),
    /// Nested object or map.
    Map(AttrMap),
}

impl AttrValue {
    /// Returns true if the value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the value for output.
    ///
    /// Top-level strings render bare; strings nested in lists or maps are quoted.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, n),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?} = {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Compares integers exactly; floats compare by value.
#[allow(clippy::float_cmp)]
fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.as_u64() == b.as_u64(),
        _ => false,
    }
}

/// Integers print exactly; integral floats print without a fractional part.
#[allow(clippy::cast_possible_truncation)]
fn write_number(f: &mut fmt::Formatter<'_>, n: &serde_json::Number) -> fmt::Result {
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    match n.as_f64() {
        Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() < EXACT_LIMIT => {
            write!(f, "{}", x as i64)
        }
        _ => write!(f, "{n}"),
    }
}

/// Computes the rendered attribute diff between two attribute sets.
///
/// With no prior value every attribute of `after` is reported. Otherwise only
/// attributes whose new value is not structurally equal to the old one are
/// kept; an attribute missing from `before` compares against null.
#[must_use]
pub fn changed_attributes(
    before: Option<&AttrMap>,
    after: Option<&AttrMap>,
) -> BTreeMap<String, String> {
    let Some(after) = after else {
        return BTreeMap::new();
    };

    after
        .iter()
        .filter(|(name, value)| {
            before.is_none_or(|prior| match prior.get(name.as_str()) {
                Some(old) => *value != old,
                None => !value.is_null(),
            })
        })
        .map(|(name, value)| (name.clone(), value.render()))
        .collect()
}
