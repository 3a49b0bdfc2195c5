//! Declarative message customizations.
//!
//! A JSON document mapping fail method identifiers to message format and
//! argument-order overrides, applied to a failer's registries in one go:
//!
//! ```json
//! {
//!   "methods": {
//!     "fail_null(caller, reference_name)": {
//!       "message_format": "{} lost '{}'",
//!       "message_arguments": "fu0, fu1"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use failfast_core::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCustomization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_arguments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailerCustomizations {
    #[serde(default)]
    pub methods: BTreeMap<String, MethodCustomization>,
}

impl FailerCustomizations {
    /// Parses a document, rejecting blank method identifiers.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let customizations: FailerCustomizations = serde_json::from_str(json)?;
        if customizations.methods.keys().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "methods".to_owned(),
                reason: "method identifiers must not be blank".to_owned(),
            });
        }
        Ok(customizations)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document() {
        let customizations = FailerCustomizations::from_json(
            r#"{ "methods": { "fail_true(caller, reference_name)": { "message_format": "{} says no" } } }"#,
        )
        .unwrap();
        let method = &customizations.methods["fail_true(caller, reference_name)"];
        assert_eq!(method.message_format.as_deref(), Some("{} says no"));
        assert_eq!(method.message_arguments, None);
    }

    #[test]
    fn empty_document() {
        assert_eq!(FailerCustomizations::from_json("{}").unwrap(), FailerCustomizations::default());
    }

    #[test]
    fn blank_method_id_is_rejected() {
        let err = FailerCustomizations::from_json(r#"{ "methods": { " ": {} } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn serialized_form() {
        let mut customizations = FailerCustomizations::default();
        customizations.methods.insert(
            "fail_false(caller, reference_name)".to_owned(),
            MethodCustomization {
                message_format: None,
                message_arguments: Some("fu1".to_owned()),
            },
        );
        insta::assert_json_snapshot!(customizations, @r###"
        {
          "methods": {
            "fail_false(caller, reference_name)": {
              "message_arguments": "fu1"
            }
          }
        }
        "###);
    }
}
