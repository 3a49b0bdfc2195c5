//! Positional arguments captured by checks and fails.
//!
//! Operands are rendered eagerly when a contract is staged, so a contract
//! owns everything it needs to build a message later without borrowing
//! the caller's data.

use std::fmt;

use serde::Serialize;

use crate::caller::Caller;

/// One captured argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Arg {
    /// An absent operand. Renders as `None`.
    Absent,
    /// The asserting caller.
    Caller(Caller),
    /// Free text such as a reference name or a user message.
    Text(String),
    /// A rendered operand value (its `Debug` form).
    Value(String),
}

impl Arg {
    pub fn value<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Arg::Value(format!("{value:?}"))
    }

    /// `Absent` for `None`, otherwise the rendered value.
    pub fn optional<T: fmt::Debug + ?Sized>(value: Option<&T>) -> Self {
        value.map_or(Arg::Absent, Arg::value)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Arg::Text(text.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Arg::Absent)
    }

    pub fn as_caller(&self) -> Option<&Caller> {
        match self {
            Arg::Caller(caller) => Some(caller),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Absent => f.write_str("None"),
            Arg::Caller(caller) => fmt::Display::fmt(caller, f),
            Arg::Text(text) => f.write_str(text),
            Arg::Value(rendered) => f.write_str(rendered),
        }
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_owned())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<Caller> for Arg {
    fn from(caller: Caller) -> Self {
        Arg::Caller(caller)
    }
}
