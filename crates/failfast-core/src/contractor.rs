//! Per-thread staging of contracts between a check and its fail.
//!
//! [`CallContractor`] holds at most one pending [`Contract`] per thread.
//! A check pushes, the matching fail pops, and anything out of order is
//! reported as a [`ProtocolViolation`]. Threads never observe each other's
//! contracts.

use std::thread::{self, ThreadId};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::caller::Caller;
use crate::contract::Contract;
use crate::error::{FailFastError, ProtocolViolation};
use crate::spec::{CheckSpec, FailSpec};

/// Shared contract slot table, one slot per calling thread.
#[derive(Debug, Default)]
pub struct CallContractor {
    slots: DashMap<ThreadId, Contract>,
}

fn violation(violation: ProtocolViolation) -> FailFastError {
    tracing::warn!(%violation, "call contract violated");
    violation.into()
}

fn require_caller<'c>(caller: Option<&'c Caller>) -> Result<&'c Caller, FailFastError> {
    caller.ok_or(FailFastError::InvalidArgument { name: "caller" })
}

impl CallContractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn context() -> ThreadId {
        thread::current().id()
    }

    /// Fails with [`ProtocolViolation::CheckAlreadyPending`] if this thread
    /// already has a contract waiting for its fail.
    pub fn ensure_vacant(&self, caller: &Caller, attempted: CheckSpec) -> Result<(), FailFastError> {
        match self.slots.get(&Self::context()) {
            Some(pending) => Err(violation(ProtocolViolation::CheckAlreadyPending {
                caller: caller.label(),
                attempted,
                pending: pending.check_spec(),
                pending_caller: pending.caller().label(),
            })),
            None => Ok(()),
        }
    }

    /// Stages `contract` for the current thread.
    pub fn push(&self, contract: Contract) -> Result<(), FailFastError> {
        match self.slots.entry(Self::context()) {
            Entry::Occupied(pending) => {
                let pending = pending.get();
                Err(violation(ProtocolViolation::CheckAlreadyPending {
                    caller: contract.caller().label(),
                    attempted: contract.check_spec(),
                    pending: pending.check_spec(),
                    pending_caller: pending.caller().label(),
                }))
            }
            Entry::Vacant(slot) => {
                tracing::debug!(
                    contract = %contract.id(),
                    spec = %contract.check_spec(),
                    caller = %contract.caller(),
                    "contract staged"
                );
                slot.insert(contract);
                Ok(())
            }
        }
    }

    /// Removes and returns the current thread's contract.
    ///
    /// The slot must be occupied, the contract must have been pushed by
    /// the same `caller`, and its check must pair with `fail_spec`. On any
    /// mismatch the contract stays staged.
    pub fn pop<'c>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        fail_spec: FailSpec,
    ) -> Result<Contract, FailFastError> {
        let caller = require_caller(caller.into())?;
        let context = Self::context();
        let no_pending = || {
            violation(ProtocolViolation::NoPendingCheck {
                caller: caller.label(),
                fail_spec,
            })
        };

        {
            let pending = self.slots.get(&context).ok_or_else(no_pending)?;
            Self::validate_caller(&pending, caller)?;
            let expected = fail_spec.check_spec();
            if pending.check_spec() != expected {
                return Err(violation(ProtocolViolation::SpecificationMismatch {
                    fail_spec,
                    expected,
                    pending: pending.check_spec(),
                }));
            }
        }

        let (_, contract) = self.slots.remove(&context).ok_or_else(no_pending)?;
        tracing::debug!(contract = %contract.id(), spec = %fail_spec, "contract consumed");
        Ok(contract)
    }

    /// Snapshot of the current thread's contract.
    pub fn peek<'c>(&self, caller: impl Into<Option<&'c Caller>>) -> Result<Contract, FailFastError> {
        let caller = require_caller(caller.into())?;
        self.snapshot(caller)
    }

    /// Edits the current thread's contract, typically to attach
    /// instance-level overrides between a check and its fail.
    ///
    /// `edit` works on a copy and no slot is locked while it runs, so it may
    /// call back into the contractor. The copy is written back only if the
    /// same contract is still staged afterwards.
    pub fn amend<'c, R>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        edit: impl FnOnce(&mut Contract) -> R,
    ) -> Result<R, FailFastError> {
        let caller = require_caller(caller.into())?;
        let mut draft = self.snapshot(caller)?;
        let result = edit(&mut draft);

        let mut pending = self
            .slots
            .get_mut(&Self::context())
            .filter(|pending| pending.id() == draft.id())
            .ok_or_else(|| {
                violation(ProtocolViolation::NothingToAmend {
                    caller: caller.label(),
                })
            })?;
        *pending = draft;
        Ok(result)
    }

    fn snapshot(&self, caller: &Caller) -> Result<Contract, FailFastError> {
        let pending = self.slots.get(&Self::context()).ok_or_else(|| {
            violation(ProtocolViolation::NothingToAmend {
                caller: caller.label(),
            })
        })?;
        Self::validate_caller(&pending, caller)?;
        Ok(pending.clone())
    }

    /// Whether the current thread has a staged contract.
    pub fn has_pending(&self) -> bool {
        self.slots.contains_key(&Self::context())
    }

    /// Number of threads with a staged contract.
    ///
    /// Slots are keyed by thread and never reclaimed on thread exit, so a
    /// thread that ends with a contract still staged keeps counting here for
    /// the life of the contractor.
    pub fn pending_count(&self) -> usize {
        self.slots.len()
    }

    fn validate_caller(pending: &Contract, caller: &Caller) -> Result<(), FailFastError> {
        if pending.caller().is_same(caller) {
            Ok(())
        } else {
            Err(violation(ProtocolViolation::CallerMismatch {
                caller: caller.label(),
                pending_caller: pending.caller().label(),
            }))
        }
    }
}
