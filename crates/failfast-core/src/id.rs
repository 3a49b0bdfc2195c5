//! Process-unique identifiers for checkers, failers, contracts and
//! observer registrations.
//!
//! Each id is a distinct newtype over `u64`, so a `CheckerId` cannot be
//! passed where a `FailerId` is expected. Fresh ids come from per-kind
//! atomic counters and are never reused within a process.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identity of a Checker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckerId(pub u64);

/// Identity of a Failer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FailerId(pub u64);

/// Identity of one staged contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub u64);

/// Token handed out when an observer is registered; required to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistrationKey(pub u64);

static NEXT_CHECKER: AtomicU64 = AtomicU64::new(1);
static NEXT_FAILER: AtomicU64 = AtomicU64::new(1);
static NEXT_CONTRACT: AtomicU64 = AtomicU64::new(1);
static NEXT_REGISTRATION: AtomicU64 = AtomicU64::new(1);

impl CheckerId {
    /// Allocates a fresh checker id.
    pub fn next() -> Self {
        CheckerId(NEXT_CHECKER.fetch_add(1, Ordering::Relaxed))
    }
}

impl FailerId {
    /// Allocates a fresh failer id.
    pub fn next() -> Self {
        FailerId(NEXT_FAILER.fetch_add(1, Ordering::Relaxed))
    }
}

impl ContractId {
    /// Allocates a fresh contract id.
    pub fn next() -> Self {
        ContractId(NEXT_CONTRACT.fetch_add(1, Ordering::Relaxed))
    }
}

impl RegistrationKey {
    /// Allocates a fresh registration key.
    pub fn next() -> Self {
        RegistrationKey(NEXT_REGISTRATION.fetch_add(1, Ordering::Relaxed))
    }
}

// Display implementations -- prefix with the kind so log lines stay readable.

impl fmt::Display for CheckerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "checker#{}", self.0)
    }
}

impl fmt::Display for FailerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failer#{}", self.0)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contract#{}", self.0)
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}
