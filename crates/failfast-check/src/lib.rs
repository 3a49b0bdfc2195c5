//! Checkers: detect a violated condition and stage its contract.
//!
//! Every `is_*` method answers whether the named condition holds. When it
//! does, a contract is staged with the shared call contractor and the
//! caller is expected to invoke the paired fail next.

pub mod checker;
pub mod compare;
pub mod config;
pub mod defaults;

pub use checker::{Checker, Evidence};
pub use compare::{AlmostOutcome, Float, SequenceDifference};
pub use config::CheckerConfig;
pub use defaults::{DefaultSentinels, Enumerated};
