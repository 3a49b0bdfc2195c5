//! Failers: consume a staged contract and produce the failure.
//!
//! The message, its argument order and the failure type are each resolved
//! from the contract's own overrides, then the failer's per-method
//! registries, then the fail method's built-in defaults.

pub mod config;
pub mod customizer;
pub mod failer;
pub mod methods;
pub mod observer;

pub use config::{FailerCustomizations, MethodCustomization};
pub use customizer::{FailerCustomizer, OverrideRegistry};
pub use failer::Failer;
pub use methods::FailMethod;
pub use observer::{FailerObserver, ObserverRegistry};
