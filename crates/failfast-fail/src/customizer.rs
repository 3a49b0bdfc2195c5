//! Per-method overrides, keyed by fail method identifier.
//!
//! A registry holds at most one override per method. Registering over an
//! existing entry or removing a missing one is a protocol violation, so
//! two components cannot silently replace each other's settings.

use std::fmt;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use failfast_core::{ArgumentOrder, CustomFailure, FailFastError, ProtocolViolation};

fn require_method_id(method_id: &str) -> Result<&str, FailFastError> {
    if method_id.trim().is_empty() {
        Err(FailFastError::InvalidArgument { name: "method_id" })
    } else {
        Ok(method_id)
    }
}

/// Single-slot-per-method override table.
pub struct OverrideRegistry<V> {
    kind: &'static str,
    entries: DashMap<String, V>,
}

impl<V: Clone + fmt::Display> OverrideRegistry<V> {
    pub fn new(kind: &'static str) -> Self {
        OverrideRegistry {
            kind,
            entries: DashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The override for `method_id`, if any.
    pub fn get(&self, method_id: &str) -> Result<Option<V>, FailFastError> {
        let method_id = require_method_id(method_id)?;
        Ok(self.lookup(method_id))
    }

    pub(crate) fn lookup(&self, method_id: &str) -> Option<V> {
        self.entries.get(method_id).map(|entry| entry.value().clone())
    }

    pub fn register(&self, method_id: &str, value: V) -> Result<(), FailFastError> {
        let method_id = require_method_id(method_id)?;
        match self.entries.entry(method_id.to_owned()) {
            Entry::Occupied(existing) => {
                let violation = ProtocolViolation::AlreadyRegistered {
                    kind: self.kind,
                    method_id: method_id.to_owned(),
                    existing: existing.get().to_string(),
                };
                tracing::warn!(%violation, "override rejected");
                Err(violation.into())
            }
            Entry::Vacant(slot) => {
                tracing::debug!(kind = self.kind, method_id, %value, "override registered");
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Removes and returns the override for `method_id`.
    pub fn unregister(&self, method_id: &str) -> Result<V, FailFastError> {
        let method_id = require_method_id(method_id)?;
        match self.entries.remove(method_id) {
            Some((_, value)) => {
                tracing::debug!(kind = self.kind, method_id, "override removed");
                Ok(value)
            }
            None => {
                let violation = ProtocolViolation::NotRegistered {
                    kind: self.kind,
                    method_id: method_id.to_owned(),
                };
                tracing::warn!(%violation, "override removal rejected");
                Err(violation.into())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> fmt::Debug for OverrideRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideRegistry")
            .field("kind", &self.kind)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// The three per-method registries a failer consults.
#[derive(Debug)]
pub struct FailerCustomizer {
    failure_types: OverrideRegistry<CustomFailure>,
    message_formats: OverrideRegistry<String>,
    message_arguments: OverrideRegistry<ArgumentOrder>,
}

impl Default for FailerCustomizer {
    fn default() -> Self {
        FailerCustomizer {
            failure_types: OverrideRegistry::new("custom failure type"),
            message_formats: OverrideRegistry::new("custom message format"),
            message_arguments: OverrideRegistry::new("custom message arguments"),
        }
    }
}

impl FailerCustomizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn custom_failure(&self, method_id: &str) -> Result<Option<CustomFailure>, FailFastError> {
        self.failure_types.get(method_id)
    }

    pub fn register_custom_failure(&self, method_id: &str, failure: CustomFailure) -> Result<(), FailFastError> {
        self.failure_types.register(method_id, failure)
    }

    pub fn unregister_custom_failure(&self, method_id: &str) -> Result<CustomFailure, FailFastError> {
        self.failure_types.unregister(method_id)
    }

    pub fn custom_message_format(&self, method_id: &str) -> Result<Option<String>, FailFastError> {
        self.message_formats.get(method_id)
    }

    pub fn register_custom_message_format(&self, method_id: &str, format: impl Into<String>) -> Result<(), FailFastError> {
        self.message_formats.register(method_id, format.into())
    }

    pub fn unregister_custom_message_format(&self, method_id: &str) -> Result<String, FailFastError> {
        self.message_formats.unregister(method_id)
    }

    pub fn custom_message_arguments(&self, method_id: &str) -> Result<Option<ArgumentOrder>, FailFastError> {
        self.message_arguments.get(method_id)
    }

    /// Parses `descriptor` and registers it for `method_id`.
    pub fn register_custom_message_arguments(&self, method_id: &str, descriptor: &str) -> Result<(), FailFastError> {
        let method_id = require_method_id(method_id)?;
        self.message_arguments.register(method_id, descriptor.parse()?)
    }

    pub fn unregister_custom_message_arguments(&self, method_id: &str) -> Result<ArgumentOrder, FailFastError> {
        self.message_arguments.unregister(method_id)
    }

    pub(crate) fn failure_types(&self) -> &OverrideRegistry<CustomFailure> {
        &self.failure_types
    }

    pub(crate) fn message_formats(&self) -> &OverrideRegistry<String> {
        &self.message_formats
    }

    pub(crate) fn message_arguments(&self) -> &OverrideRegistry<ArgumentOrder> {
        &self.message_arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, thiserror::Error)]
    #[error("stock exhausted")]
    struct StockExhausted;

    const METHOD: &str = "fail_null(caller, reference_name)";

    #[test]
    fn register_get_unregister() {
        let customizer = FailerCustomizer::new();
        assert_eq!(customizer.custom_message_format(METHOD).unwrap(), None);

        customizer.register_custom_message_format(METHOD, "{} missing").unwrap();
        assert_eq!(customizer.custom_message_format(METHOD).unwrap().as_deref(), Some("{} missing"));

        assert_eq!(customizer.unregister_custom_message_format(METHOD).unwrap(), "{} missing");
        assert_eq!(customizer.custom_message_format(METHOD).unwrap(), None);
    }

    #[test]
    fn single_slot_per_method() {
        let customizer = FailerCustomizer::new();
        customizer.register_custom_failure(METHOD, CustomFailure::of::<StockExhausted>()).unwrap();
        let err = customizer
            .register_custom_failure(METHOD, CustomFailure::of::<StockExhausted>())
            .unwrap_err();
        assert!(matches!(
            err.protocol_violation(),
            Some(ProtocolViolation::AlreadyRegistered { kind: "custom failure type", .. })
        ));

        customizer.unregister_custom_failure(METHOD).unwrap();
        let err = customizer.unregister_custom_failure(METHOD).unwrap_err();
        assert!(matches!(
            err.protocol_violation(),
            Some(ProtocolViolation::NotRegistered { .. })
        ));
    }

    #[test]
    fn blank_method_id_is_invalid() {
        let customizer = FailerCustomizer::new();
        assert!(customizer.custom_message_format("  ").unwrap_err().is_invalid_argument());
        assert!(customizer.register_custom_message_format("", "x").unwrap_err().is_invalid_argument());
        assert!(customizer.unregister_custom_message_arguments("").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn argument_descriptors_are_parsed_on_registration() {
        let customizer = FailerCustomizer::new();
        let err = customizer.register_custom_message_arguments(METHOD, "fu0, nope").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(customizer.message_arguments().is_empty());

        customizer.register_custom_message_arguments(METHOD, "fu1,fu0").unwrap();
        let order = customizer.custom_message_arguments(METHOD).unwrap().unwrap();
        assert_eq!(order.to_string(), "fu1, fu0");
    }

    #[test]
    fn violation_message_names_existing_value() {
        let customizer = FailerCustomizer::new();
        customizer.register_custom_message_format(METHOD, "first").unwrap();
        let err = customizer.register_custom_message_format(METHOD, "second").unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"custom message format for 'fail_null(caller, reference_name)' is already registered as 'first'"
        );
    }
}
