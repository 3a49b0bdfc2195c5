//! Fail-fast design by contract.
//!
//! A [`Checker`] answers whether a violated condition holds and, if so,
//! stages a contract; the paired fail on the [`Failer`] consumes it and
//! produces the failure to propagate:
//!
//! ```
//! use failfast::{Caller, FailFast, FailFastError};
//!
//! fn reserve(ff: &FailFast, caller: &Caller, quantity: i64) -> Result<(), FailFastError> {
//!     if ff.checker().is_less(caller, Some(&quantity), Some(&1))? {
//!         return Err(ff.failer().fail_less(caller, "quantity", "1", None));
//!     }
//!     Ok(())
//! }
//!
//! let ff = FailFast::new();
//! let caller = Caller::new("Inventory");
//! assert!(reserve(&ff, &caller, 3).is_ok());
//! let err = reserve(&ff, &caller, 0).unwrap_err();
//! assert_eq!(err.to_string(), "Inventory: 'quantity'(0) is less than '1'(1).");
//! ```

pub use failfast_check::{Checker, CheckerConfig, DefaultSentinels, Enumerated, Evidence, Float};
pub use failfast_core::{
    Arg, ArgumentOrder, CallContractor, Caller, CheckSpec, CheckerId, ConfigError, Contract, CustomFailure,
    CustomFailureError, FailFastError, FailFastException, FailSpec, FailerId, ProtocolViolation,
    RegistrationKey, Resolution,
};
pub use failfast_fail::{
    FailMethod, Failer, FailerCustomizations, FailerCustomizer, FailerObserver, MethodCustomization,
};

pub mod compare {
    //! Comparison algorithms, usable without the check protocol.
    pub use failfast_check::compare::*;
}

use std::sync::Arc;

/// A checker and a failer sharing one call contractor.
#[derive(Debug)]
pub struct FailFast {
    contractor: Arc<CallContractor>,
    checker: Checker,
    failer: Failer,
}

impl Default for FailFast {
    fn default() -> Self {
        Self::new()
    }
}

impl FailFast {
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        let contractor = Arc::new(CallContractor::new());
        let checker = Checker::with_config(Arc::clone(&contractor), config);
        let failer = Failer::new(Arc::clone(&contractor));
        tracing::debug!(checker = %checker.id(), failer = %failer.id(), "fail-fast triple assembled");
        FailFast {
            contractor,
            checker,
            failer,
        }
    }

    /// Assembles a triple from existing parts. Both the checker and the
    /// failer must have been built on `contractor`.
    pub fn with_parts(checker: Checker, failer: Failer, contractor: Arc<CallContractor>) -> Result<Self, FailFastError> {
        if !Arc::ptr_eq(checker.contractor(), &contractor) || !Arc::ptr_eq(failer.contractor(), &contractor) {
            let violation = ProtocolViolation::ContractorMismatch;
            tracing::warn!(%violation, "fail-fast triple rejected");
            return Err(violation.into());
        }
        Ok(FailFast {
            contractor,
            checker,
            failer,
        })
    }

    pub fn checker(&self) -> &Checker {
        &self.checker
    }

    pub fn failer(&self) -> &Failer {
        &self.failer
    }

    pub fn contractor(&self) -> &Arc<CallContractor> {
        &self.contractor
    }
}
