//! Observers notified right before a failer hands out a failure.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use failfast_core::{Contract, FailFastError, ProtocolViolation, RegistrationKey};

use crate::failer::Failer;

/// Receives every failure a failer produces, before the caller sees it.
///
/// Observers run on the failing thread, in registration order. A panicking
/// observer unwinds out of the fail call; the contract has been consumed
/// by then.
pub trait FailerObserver: Send + Sync {
    fn notify_failure_before_raise(&self, failer: &Failer, contract: &Contract, failure: &FailFastError);
}

impl<F> FailerObserver for F
where
    F: Fn(&Failer, &Contract, &FailFastError) + Send + Sync,
{
    fn notify_failure_before_raise(&self, failer: &Failer, contract: &Contract, failure: &FailFastError) {
        self(failer, contract, failure)
    }
}

struct Registration {
    observer: Arc<dyn FailerObserver>,
    key: RegistrationKey,
}

/// Ordered observer list. An observer, identified by its allocation, can be
/// registered at most once.
#[derive(Default)]
pub struct ObserverRegistry {
    registrations: RwLock<Vec<Registration>>,
}

fn same_observer<O: FailerObserver + ?Sized>(registered: &Arc<dyn FailerObserver>, candidate: &Arc<O>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(registered), Arc::as_ptr(candidate))
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `observer` and returns the key needed to remove it.
    pub fn register(&self, observer: Arc<dyn FailerObserver>) -> Result<RegistrationKey, FailFastError> {
        let mut registrations = self.registrations.write();
        if let Some(existing) = registrations.iter().find(|r| same_observer(&r.observer, &observer)) {
            let violation = ProtocolViolation::ObserverAlreadyRegistered { key: existing.key };
            tracing::warn!(%violation, "observer registration rejected");
            return Err(violation.into());
        }
        let key = RegistrationKey::next();
        registrations.push(Registration { observer, key });
        tracing::debug!(%key, observers = registrations.len(), "observer registered");
        Ok(key)
    }

    /// Removes `observer`; `key` must be the one its registration returned.
    pub fn unregister<O>(&self, observer: &Arc<O>, key: RegistrationKey) -> Result<(), FailFastError>
    where
        O: FailerObserver + ?Sized,
    {
        let mut registrations = self.registrations.write();
        let position = registrations.iter().position(|r| same_observer(&r.observer, observer));
        let violation = match position {
            Some(index) if registrations[index].key == key => {
                registrations.remove(index);
                tracing::debug!(%key, "observer unregistered");
                return Ok(());
            }
            Some(_) => ProtocolViolation::RegistrationKeyMismatch { given: key },
            None => ProtocolViolation::ObserverNotRegistered,
        };
        tracing::warn!(%violation, "observer removal rejected");
        Err(violation.into())
    }

    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Notifies a snapshot of the current observers in registration order.
    /// No lock is held while observers run, so they may (un)register.
    pub(crate) fn notify(&self, failer: &Failer, contract: &Contract, failure: &FailFastError) {
        let observers: Vec<Arc<dyn FailerObserver>> = self
            .registrations
            .read()
            .iter()
            .map(|r| Arc::clone(&r.observer))
            .collect();
        for observer in observers {
            observer.notify_failure_before_raise(failer, contract, failure);
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}
