//! Check and fail specifications.
//!
//! Every check kind has exactly one matching fail kind. Both enums are
//! generated from a single table so the pairing cannot drift.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! specifications {
    ($( $variant:ident => $name:literal ),* $(,)?) => {
        /// Identifies which condition a check detected.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum CheckSpec {
            $($variant),*
        }

        /// Identifies which failure a fail raises. Pairs one-to-one with [`CheckSpec`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum FailSpec {
            $($variant),*
        }

        impl CheckSpec {
            pub const ALL: &'static [CheckSpec] = &[$(CheckSpec::$variant),*];

            /// The fail that consumes contracts staged by this check.
            pub fn fail_spec(self) -> FailSpec {
                match self {
                    $(CheckSpec::$variant => FailSpec::$variant),*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(CheckSpec::$variant => concat!($name, "-check")),*
                }
            }
        }

        impl FailSpec {
            pub const ALL: &'static [FailSpec] = &[$(FailSpec::$variant),*];

            /// The check whose contract this fail consumes.
            pub fn check_spec(self) -> CheckSpec {
                match self {
                    $(FailSpec::$variant => CheckSpec::$variant),*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(FailSpec::$variant => concat!($name, "-fail")),*
                }
            }
        }
    };
}

specifications! {
    Null => "null",
    NotNull => "not-null",
    Equals => "equals",
    NotEquals => "not-equals",
    Same => "same",
    NotSame => "not-same",
    Default => "default",
    NotDefault => "not-default",
    Less => "less",
    LessOrEquals => "less-or-equals",
    Greater => "greater",
    GreaterOrEquals => "greater-or-equals",
    Inside => "inside",
    Outside => "outside",
    EqualsAlmost => "equals-almost",
    NotEqualsAlmost => "not-equals-almost",
    SequenceEquals => "sequence-equals",
    SequenceNotEquals => "sequence-not-equals",
    True => "true",
    False => "false",
}

impl fmt::Display for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FailSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pairing_is_a_bijection() {
        assert_eq!(CheckSpec::ALL.len(), FailSpec::ALL.len());
        let images: HashSet<FailSpec> = CheckSpec::ALL.iter().map(|c| c.fail_spec()).collect();
        assert_eq!(images.len(), FailSpec::ALL.len());
        for &check in CheckSpec::ALL {
            assert_eq!(check.fail_spec().check_spec(), check);
        }
    }

    #[test]
    fn names() {
        assert_eq!(CheckSpec::NotNull.to_string(), "not-null-check");
        assert_eq!(FailSpec::EqualsAlmost.to_string(), "equals-almost-fail");
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&CheckSpec::GreaterOrEquals).unwrap();
        assert_eq!(json, "\"greater_or_equals\"");
        let back: FailSpec = serde_json::from_str("\"sequence_not_equals\"").unwrap();
        assert_eq!(back, FailSpec::SequenceNotEquals);
    }
}
