//! Error types for the fail-fast library.
//!
//! Every fallible operation returns [`FailFastError`]. Its variants split
//! into argument errors, call-protocol violations and the assertion
//! failures a Failer raises on purpose.

use std::sync::Arc;

use thiserror::Error;

use crate::exception::FailFastException;
use crate::failure::CustomFailureError;
use crate::id::RegistrationKey;
use crate::spec::{CheckSpec, FailSpec};

/// Errors produced by checkers, failers and their registries.
#[derive(Debug, Error)]
pub enum FailFastError {
    /// A required input was absent or blank.
    #[error("invalid argument: '{name}' must be present")]
    InvalidArgument { name: &'static str },

    /// An argument-order descriptor could not be parsed.
    #[error("invalid argument: malformed argument order '{descriptor}': {reason}")]
    MalformedArgumentOrder { descriptor: String, reason: String },

    /// The check/fail pairing protocol was broken.
    #[error(transparent)]
    ProtocolViolation(#[from] ProtocolViolation),

    /// The library assertion failure raised by a fail.
    #[error("{0}")]
    Assertion(Arc<FailFastException>),

    /// A caller-selected failure type raised by a fail.
    #[error("{0}")]
    Custom(CustomFailureError),
}

impl FailFastError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            FailFastError::InvalidArgument { .. } | FailFastError::MalformedArgumentOrder { .. }
        )
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, FailFastError::ProtocolViolation(_))
    }

    pub fn protocol_violation(&self) -> Option<&ProtocolViolation> {
        match self {
            FailFastError::ProtocolViolation(violation) => Some(violation),
            _ => None,
        }
    }

    /// The library failure, if this is one.
    pub fn as_assertion(&self) -> Option<&Arc<FailFastException>> {
        match self {
            FailFastError::Assertion(exception) => Some(exception),
            _ => None,
        }
    }

    /// The custom failure, if this is one and it has type `E`.
    pub fn downcast_custom<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FailFastError::Custom(custom) => custom.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Breaches of the check/fail protocol and of registry bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error(
        "cannot start {attempted} for caller {caller}: {pending} by caller {pending_caller} has not been consumed by a fail"
    )]
    CheckAlreadyPending {
        caller: String,
        attempted: CheckSpec,
        pending: CheckSpec,
        pending_caller: String,
    },

    #[error("cannot run {fail_spec} for caller {caller}: no check is pending")]
    NoPendingCheck { caller: String, fail_spec: FailSpec },

    #[error("caller {caller} has no pending contract to amend")]
    NothingToAmend { caller: String },

    #[error("caller {caller} cannot consume the contract pushed by caller {pending_caller}")]
    CallerMismatch { caller: String, pending_caller: String },

    #[error("{fail_spec} requires {expected} but {pending} is pending")]
    SpecificationMismatch {
        fail_spec: FailSpec,
        expected: CheckSpec,
        pending: CheckSpec,
    },

    #[error("{kind} for '{method_id}' is already registered as '{existing}'")]
    AlreadyRegistered {
        kind: &'static str,
        method_id: String,
        existing: String,
    },

    #[error("no {kind} is registered for '{method_id}'")]
    NotRegistered { kind: &'static str, method_id: String },

    #[error("failer observer is already registered under {key}")]
    ObserverAlreadyRegistered { key: RegistrationKey },

    #[error("failer observer is not registered")]
    ObserverNotRegistered,

    #[error("registration key {given} was not issued to this observer")]
    RegistrationKeyMismatch { given: RegistrationKey },

    #[error("checker and failer must share the call contractor they are assembled with")]
    ContractorMismatch,
}

/// Errors loading configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration value '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
