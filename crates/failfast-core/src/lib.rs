//! Shared data model for fail-fast design by contract.
//!
//! A check that detects a violated condition stages a [`Contract`] with the
//! [`CallContractor`]; the fail that follows consumes it and turns it into a
//! failure. Everything both halves need to agree on lives here.

pub mod arg;
pub mod caller;
pub mod contract;
pub mod contractor;
pub mod error;
pub mod exception;
pub mod failure;
pub mod id;
pub mod message;
pub mod order;
pub mod spec;

// Re-export commonly used types
pub use arg::Arg;
pub use caller::Caller;
pub use contract::{Contract, Resolution};
pub use contractor::CallContractor;
pub use error::{ConfigError, FailFastError, ProtocolViolation};
pub use exception::FailFastException;
pub use failure::{CustomFailure, CustomFailureError};
pub use id::{CheckerId, ContractId, FailerId, RegistrationKey};
pub use order::{ArgPosition, ArgSource, ArgSources, ArgumentOrder};
pub use spec::{CheckSpec, FailSpec};
