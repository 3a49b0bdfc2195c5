//! The library's own assertion failure.

use serde::Serialize;
use thiserror::Error;

use crate::arg::Arg;
use crate::order::ArgumentOrder;
use crate::spec::{CheckSpec, FailSpec};

/// Raised by a fail when no custom failure type applies. Carries the
/// complete diagnostic picture of the contract that produced it.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct FailFastException {
    pub check_spec: CheckSpec,
    pub fail_spec: FailSpec,
    /// Identifier of the fail method that raised this failure.
    pub method_id: String,
    pub check_user_args: Vec<Arg>,
    pub check_extra_args: Vec<Arg>,
    pub fail_user_args: Vec<Arg>,
    pub fail_extra_args: Vec<Arg>,
    pub message_format: String,
    pub message_arguments: ArgumentOrder,
    pub message: String,
}
