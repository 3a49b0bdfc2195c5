//! Built-in fail method descriptors.
//!
//! Each fail method has a stable identifier (the key for per-method
//! customization), the fail spec it consumes, a default message template
//! and a default argument order. Every method comes in two forms, the
//! second taking a trailing user message.

use failfast_core::{ArgumentOrder, FailFastError, FailSpec};

/// A fail method descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailMethod {
    pub id: &'static str,
    pub spec: FailSpec,
    pub format: &'static str,
    pub arguments: &'static str,
}

impl FailMethod {
    pub fn default_arguments(&self) -> Result<ArgumentOrder, FailFastError> {
        self.arguments.parse()
    }

    /// Looks a method up by identifier.
    pub fn find(id: &str) -> Option<&'static FailMethod> {
        Self::ALL.iter().find(|method| method.id == id)
    }
}

macro_rules! fail_methods {
    ($(
        $plain:ident, $with_message:ident => $spec:ident, $name:literal($params:literal),
            $format:literal, $arguments:literal, $message:literal;
    )*) => {
        impl FailMethod {
            $(
                pub const $plain: FailMethod = FailMethod {
                    id: concat!($name, "(caller, ", $params, ")"),
                    spec: FailSpec::$spec,
                    format: $format,
                    arguments: $arguments,
                };

                pub const $with_message: FailMethod = FailMethod {
                    id: concat!($name, "(caller, ", $params, ", message)"),
                    spec: FailSpec::$spec,
                    format: concat!($format, " {}"),
                    arguments: concat!($arguments, ", ", $message),
                };
            )*

            pub const ALL: &'static [FailMethod] = &[$(FailMethod::$plain, FailMethod::$with_message),*];
        }
    };
}

fail_methods! {
    NULL, NULL_MESSAGE => Null, "fail_null"("reference_name"),
        "{}: '{}' is None.", "fu0, fu1", "fu2";
    NOT_NULL, NOT_NULL_MESSAGE => NotNull, "fail_not_null"("reference_name"),
        "{}: '{}' is not None, it is {}.", "fu0, fu1, cu1", "fu2";
    EQUALS, EQUALS_MESSAGE => Equals, "fail_equals"("a_name, b_name"),
        "{}: '{}'({}) is equal to '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    NOT_EQUALS, NOT_EQUALS_MESSAGE => NotEquals, "fail_not_equals"("a_name, b_name"),
        "{}: '{}'({}) is NOT equal to '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    SAME, SAME_MESSAGE => Same, "fail_same"("a_name, b_name"),
        "{}: '{}'({}) is the same instance as '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    NOT_SAME, NOT_SAME_MESSAGE => NotSame, "fail_not_same"("a_name, b_name"),
        "{}: '{}'({}) is NOT the same instance as '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    DEFAULT, DEFAULT_MESSAGE => Default, "fail_default"("reference_name"),
        "{}: '{}'({}) is the default ({}).", "fu0, fu1, cu1, cx0", "fu2";
    NOT_DEFAULT, NOT_DEFAULT_MESSAGE => NotDefault, "fail_not_default"("reference_name"),
        "{}: '{}'({}) is NOT the default ({}).", "fu0, fu1, cu1, cx0", "fu2";
    LESS, LESS_MESSAGE => Less, "fail_less"("a_name, b_name"),
        "{}: '{}'({}) is less than '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    LESS_OR_EQUALS, LESS_OR_EQUALS_MESSAGE => LessOrEquals, "fail_less_or_equals"("a_name, b_name"),
        "{}: '{}'({}) is less than or equal to '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    GREATER, GREATER_MESSAGE => Greater, "fail_greater"("a_name, b_name"),
        "{}: '{}'({}) is greater than '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    GREATER_OR_EQUALS, GREATER_OR_EQUALS_MESSAGE => GreaterOrEquals, "fail_greater_or_equals"("a_name, b_name"),
        "{}: '{}'({}) is greater than or equal to '{}'({}).", "fu0, fu1, cu1, fu2, cu2", "fu3";
    INSIDE, INSIDE_MESSAGE => Inside, "fail_inside"("reference_name"),
        "{}: '{}'({}) is inside [{}; {}].", "fu0, fu1, cu1, cu2, cu3", "fu2";
    OUTSIDE, OUTSIDE_MESSAGE => Outside, "fail_outside"("reference_name"),
        "{}: '{}'({}) is outside [{}; {}].", "fu0, fu1, cu1, cu2, cu3", "fu2";
    EQUALS_ALMOST, EQUALS_ALMOST_MESSAGE => EqualsAlmost, "fail_equals_almost"("a_name, b_name"),
        "{}: '{}'({}) is almost equal to '{}'({}), within [{}; {}].", "fu0, fu1, cu1, fu2, cu2, cx2, cx3", "fu3";
    NOT_EQUALS_ALMOST, NOT_EQUALS_ALMOST_MESSAGE => NotEqualsAlmost, "fail_not_equals_almost"("a_name, b_name"),
        "{}: '{}'({}) is NOT almost equal to '{}'({}), outside [{}; {}].", "fu0, fu1, cu1, fu2, cu2, cx2, cx3", "fu3";
    SEQUENCE_EQUALS, SEQUENCE_EQUALS_MESSAGE => SequenceEquals, "fail_sequence_equals"("a_name, b_name"),
        "{}: sequence '{}' is equal to sequence '{}', {} elements {}.", "fu0, fu1, fu2, cx0, cx1", "fu3";
    SEQUENCE_NOT_EQUALS, SEQUENCE_NOT_EQUALS_MESSAGE => SequenceNotEquals, "fail_sequence_not_equals"("a_name, b_name"),
        "{}: sequence '{}' is NOT equal to sequence '{}', first difference at index {}: {} vs {}.",
        "fu0, fu1, fu2, cx0, cx1, cx2", "fu3";
    TRUE, TRUE_MESSAGE => True, "fail_true"("reference_name"),
        "{}: '{}' is true.", "fu0, fu1", "fu2";
    FALSE, FALSE_MESSAGE => False, "fail_false"("reference_name"),
        "{}: '{}' is false.", "fu0, fu1", "fu2";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_default_argument_order_parses() {
        for method in FailMethod::ALL {
            assert!(method.default_arguments().is_ok(), "{}", method.id);
        }
    }

    #[test]
    fn identifiers_are_unique_and_cover_every_fail_spec() {
        let ids: HashSet<&str> = FailMethod::ALL.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), FailMethod::ALL.len());
        let specs: HashSet<FailSpec> = FailMethod::ALL.iter().map(|m| m.spec).collect();
        assert_eq!(specs.len(), FailSpec::ALL.len());
    }

    #[test]
    fn message_variant_appends_message_argument() {
        assert_eq!(FailMethod::NULL.id, "fail_null(caller, reference_name)");
        assert_eq!(FailMethod::NULL_MESSAGE.id, "fail_null(caller, reference_name, message)");
        assert_eq!(FailMethod::EQUALS_MESSAGE.format, "{}: '{}'({}) is equal to '{}'({}). {}");
        assert_eq!(FailMethod::EQUALS_MESSAGE.arguments, "fu0, fu1, cu1, fu2, cu2, fu3");
        assert_eq!(FailMethod::find(FailMethod::OUTSIDE.id), Some(&FailMethod::OUTSIDE));
        assert_eq!(FailMethod::find("fail_unknown(caller)"), None);
    }
}
