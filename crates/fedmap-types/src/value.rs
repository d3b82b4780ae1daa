use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::ResourceId;

/// Whether an attribute holds one value or an ordered collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly one value (or none).
    #[default]
    Single,
    /// An ordered sequence of values.
    Multiple,
}

impl Cardinality {
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single-valued"),
            Self::Multiple => write!(f, "multi-valued"),
        }
    }
}

/// A single attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Reference to another resource by id.
    Reference(ResourceId),
}

impl Scalar {
    /// Plain JSON rendering, used for index documents.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Reference(id) => serde_json::Value::String(id.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Reference(id) => write!(f, "<{id}>"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<ResourceId> for Scalar {
    fn from(id: ResourceId) -> Self {
        Self::Reference(id)
    }
}

/// An attribute value as read or written by application code.
///
/// `Single` and `Many` are distinct shapes: writing a `Many` to a
/// single-valued attribute (or a `Single` to a multi-valued one) is a
/// cardinality error even when the sequence has one element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Single(Scalar),
    Many(Vec<Scalar>),
}

impl Value {
    /// Build a sequence value.
    pub fn many<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Self::Many(items.into_iter().map(Into::into).collect())
    }

    /// `Null` or an empty sequence. Blank values pass any cardinality check.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Single(_) => false,
            Self::Many(items) => items.is_empty(),
        }
    }

    /// Returns `true` for the sequence shape.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// First scalar, whatever the shape.
    pub fn first(&self) -> Option<&Scalar> {
        match self {
            Self::Null => None,
            Self::Single(s) => Some(s),
            Self::Many(items) => items.first(),
        }
    }

    /// Flatten into an ordered list of scalars.
    pub fn into_vec(self) -> Vec<Scalar> {
        match self {
            Self::Null => Vec::new(),
            Self::Single(s) => vec![s],
            Self::Many(items) => items,
        }
    }

    /// Shape a stored sequence for the given cardinality: multi-valued
    /// attributes see the full sequence, single-valued ones its first element.
    pub fn shaped(items: Vec<Scalar>, cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::Multiple => Self::Many(items),
            Cardinality::Single => items.into_iter().next().map_or(Self::Null, Self::Single),
        }
    }

    /// Plain JSON rendering, used for index documents.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Single(s) => s.to_json(),
            Self::Many(items) => serde_json::Value::Array(items.iter().map(Scalar::to_json).collect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "nil"),
            Self::Single(s) => write!(f, "{s}"),
            Self::Many(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! value_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Single(Scalar::from(v))
                }
            }
        )*
    };
}

value_from_scalar!(&str, String, i64, bool, ResourceId);

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<Scalar>> for Value {
    fn from(items: Vec<Scalar>) -> Self {
        Self::Many(items)
    }
}

impl From<Option<Scalar>> for Value {
    fn from(s: Option<Scalar>) -> Self {
        s.map_or(Self::Null, Self::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::Many(vec![]).is_blank());
        assert!(!Value::from("x").is_blank());
        assert!(!Value::many(["x"]).is_blank());
    }

    #[test]
    fn shaped_single_takes_first() {
        let items = vec![Scalar::from("a"), Scalar::from("b")];
        assert_eq!(Value::shaped(items, Cardinality::Single), Value::from("a"));
        assert_eq!(Value::shaped(vec![], Cardinality::Single), Value::Null);
    }

    #[test]
    fn shaped_multiple_keeps_order() {
        let items = vec![Scalar::from("b"), Scalar::from("a")];
        assert_eq!(
            Value::shaped(items, Cardinality::Multiple),
            Value::many(["b", "a"])
        );
    }

    #[test]
    fn display_quotes_strings_and_renders_nil() {
        assert_eq!(Value::Null.to_string(), "nil");
        assert_eq!(Value::many(["a", "b"]).to_string(), "[\"a\", \"b\"]");
        assert_eq!(Value::from(3i64).to_string(), "3");
    }

    #[test]
    fn to_json_flattens_references() {
        let id = ResourceId::new("foo/bar").unwrap();
        assert_eq!(Value::from(id).to_json(), serde_json::json!("foo/bar"));
        assert_eq!(
            Value::many([1i64, 2]).to_json(),
            serde_json::json!([1, 2])
        );
    }

    proptest! {
        #[test]
        fn into_vec_preserves_sequence(items in proptest::collection::vec(".*", 0..8)) {
            let value = Value::many(items.clone());
            let back: Vec<Scalar> = value.into_vec();
            prop_assert_eq!(back, items.into_iter().map(Scalar::Text).collect::<Vec<_>>());
        }
    }
}
