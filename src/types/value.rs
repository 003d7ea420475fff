//! Opaque filter values and positional call arguments.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Selection criterion applied when reading data values.
///
/// The core never interprets a filter; it only stores and forwards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Value);

impl Filter {
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Filter {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        Self(Value::from(value))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One positional argument as handed over by an interactive caller.
///
/// Whether it is a detector id or a filter is decided by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallArg(Value);

impl CallArg {
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The integer this argument carries, if any.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        self.0.as_i64()
    }

    #[must_use]
    pub fn into_filter(self) -> Filter {
        Filter(self.0)
    }
}

impl From<Value> for CallArg {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<i64> for CallArg {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<i32> for CallArg {
    fn from(value: i32) -> Self {
        Self(Value::from(value))
    }
}

impl From<u32> for CallArg {
    fn from(value: u32) -> Self {
        Self(Value::from(value))
    }
}

impl From<&str> for CallArg {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for CallArg {
    fn from(value: String) -> Self {
        Self(Value::from(value))
    }
}

impl From<Filter> for CallArg {
    fn from(filter: Filter) -> Self {
        Self(filter.0)
    }
}

impl fmt::Display for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_json_integers_count_as_integers() {
        assert_eq!(CallArg::from(1105).as_integer(), Some(1105));
        assert_eq!(CallArg::from("1105").as_integer(), None);
        assert_eq!(CallArg::new(1105.0).as_integer(), None);
    }

    #[test]
    fn argument_becomes_filter_unchanged() {
        let filter = CallArg::from("cutA").into_filter();
        assert_eq!(filter, Filter::from("cutA"));
        assert_eq!(filter.to_string(), "\"cutA\"");
    }
}
