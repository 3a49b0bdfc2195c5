//! Argument-order descriptors.
//!
//! A descriptor such as `"fu0, fu1, cu1"` picks message arguments from the
//! four argument lists of a resolved contract: check-user (`cu`), check-extra
//! (`cx`), fail-user (`fu`) and fail-extra (`fx`).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::arg::Arg;
use crate::error::FailFastError;

/// Which argument list a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgSource {
    CheckUser,
    CheckExtra,
    FailUser,
    FailExtra,
}

impl ArgSource {
    pub fn prefix(self) -> &'static str {
        match self {
            ArgSource::CheckUser => "cu",
            ArgSource::CheckExtra => "cx",
            ArgSource::FailUser => "fu",
            ArgSource::FailExtra => "fx",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "cu" => Some(ArgSource::CheckUser),
            "cx" => Some(ArgSource::CheckExtra),
            "fu" => Some(ArgSource::FailUser),
            "fx" => Some(ArgSource::FailExtra),
            _ => None,
        }
    }
}

/// A single `<source><index>` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgPosition {
    pub source: ArgSource,
    pub index: usize,
}

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source.prefix(), self.index)
    }
}

/// Borrowed view of the four argument lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgSources<'a> {
    pub check_user: &'a [Arg],
    pub check_extra: &'a [Arg],
    pub fail_user: &'a [Arg],
    pub fail_extra: &'a [Arg],
}

impl<'a> ArgSources<'a> {
    pub fn get(&self, position: ArgPosition) -> Option<&'a Arg> {
        let list = match position.source {
            ArgSource::CheckUser => self.check_user,
            ArgSource::CheckExtra => self.check_extra,
            ArgSource::FailUser => self.fail_user,
            ArgSource::FailExtra => self.fail_extra,
        };
        list.get(position.index)
    }
}

/// Parsed, ordered list of argument positions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentOrder {
    positions: Vec<ArgPosition>,
}

impl ArgumentOrder {
    pub fn new(positions: Vec<ArgPosition>) -> Self {
        ArgumentOrder { positions }
    }

    pub fn positions(&self) -> &[ArgPosition] {
        &self.positions
    }

    /// Renders the selected arguments in order. A position with no
    /// argument behind it renders as `?<position>`.
    pub fn select(&self, sources: &ArgSources<'_>) -> Vec<String> {
        self.positions
            .iter()
            .map(|&position| match sources.get(position) {
                Some(arg) => arg.to_string(),
                None => format!("?{position}"),
            })
            .collect()
    }
}

fn malformed(descriptor: &str, reason: impl Into<String>) -> FailFastError {
    FailFastError::MalformedArgumentOrder {
        descriptor: descriptor.to_owned(),
        reason: reason.into(),
    }
}

impl FromStr for ArgumentOrder {
    type Err = FailFastError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        if descriptor.trim().is_empty() {
            return Ok(ArgumentOrder::default());
        }
        let mut positions = Vec::new();
        for token in descriptor.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(malformed(descriptor, "empty position"));
            }
            let (prefix, index) = match (token.get(..2), token.get(2..)) {
                (Some(prefix), Some(index)) => (prefix, index),
                _ => return Err(malformed(descriptor, format!("bad position '{token}'"))),
            };
            let source = ArgSource::from_prefix(prefix)
                .ok_or_else(|| malformed(descriptor, format!("unknown source in '{token}'")))?;
            let index = index
                .parse::<usize>()
                .map_err(|_| malformed(descriptor, format!("bad index in '{token}'")))?;
            positions.push(ArgPosition { source, index });
        }
        Ok(ArgumentOrder { positions })
    }
}

impl fmt::Display for ArgumentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, position) in self.positions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(position, f)?;
        }
        Ok(())
    }
}

impl Serialize for ArgumentOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::Caller;

    #[test]
    fn parses_and_displays() {
        let order: ArgumentOrder = "fu0,  fu1 ,cu1,cx2,fx0".parse().unwrap();
        assert_eq!(order.positions().len(), 5);
        assert_eq!(
            order.positions()[3],
            ArgPosition { source: ArgSource::CheckExtra, index: 2 }
        );
        assert_eq!(order.to_string(), "fu0, fu1, cu1, cx2, fx0");
    }

    #[test]
    fn blank_descriptor_selects_nothing() {
        let order: ArgumentOrder = "  ".parse().unwrap();
        assert!(order.positions().is_empty());
    }

    #[test]
    fn malformed_descriptors_are_invalid_arguments() {
        for bad in ["fu0,,fu1", "zz1", "fu", "fu-1", "f", "cu1x"] {
            let err = bad.parse::<ArgumentOrder>().unwrap_err();
            assert!(err.is_invalid_argument(), "{bad} should be rejected");
        }
    }

    #[test]
    fn select_renders_missing_positions() {
        let caller = Caller::new("svc");
        let fail_user = vec![Arg::Caller(caller), Arg::text("order")];
        let check_user = vec![Arg::Absent];
        let sources = ArgSources {
            check_user: &check_user,
            fail_user: &fail_user,
            ..ArgSources::default()
        };
        let order: ArgumentOrder = "fu0, fu1, cu0, cu7, cx0".parse().unwrap();
        assert_eq!(
            order.select(&sources),
            vec!["svc", "order", "None", "?cu7", "?cx0"]
        );
    }
}
