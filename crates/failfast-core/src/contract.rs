//! The record a check stages for the fail that follows it.
//!
//! A contract starts with the check's half (spec, caller, operands, extras).
//! Between check and fail the caller may attach instance-level overrides.
//! The fail then records its [`Resolution`] and, for library failures, the
//! raised exception.

use std::sync::Arc;

use serde::Serialize;

use crate::arg::Arg;
use crate::caller::Caller;
use crate::error::FailFastError;
use crate::exception::FailFastException;
use crate::failure::CustomFailure;
use crate::id::{CheckerId, ContractId};
use crate::order::{ArgSources, ArgumentOrder};
use crate::spec::{CheckSpec, FailSpec};

/// What the fail decided when it consumed the contract.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub fail_spec: FailSpec,
    pub method_id: String,
    pub fail_user_args: Vec<Arg>,
    pub fail_extra_args: Vec<Arg>,
    pub message_format: String,
    pub message_arguments: ArgumentOrder,
    /// `None` when the library failure was raised.
    pub failure_type: Option<CustomFailure>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contract {
    id: ContractId,
    caller: Caller,
    check_spec: CheckSpec,
    asserting_checker: CheckerId,
    check_user_args: Vec<Arg>,
    check_extra_args: Vec<Arg>,
    custom_failure: Option<CustomFailure>,
    custom_message_format: Option<String>,
    custom_message_arguments: Option<ArgumentOrder>,
    custom_message_postfix: Option<String>,
    resolution: Option<Resolution>,
    #[serde(skip)]
    raised: Option<Arc<FailFastException>>,
}

impl Contract {
    /// Stages a contract. `operands` are the check's own arguments; the
    /// caller is prepended as check-user argument 0.
    pub fn new(
        caller: Caller,
        check_spec: CheckSpec,
        asserting_checker: CheckerId,
        operands: Vec<Arg>,
        extras: Vec<Arg>,
    ) -> Self {
        let mut check_user_args = Vec::with_capacity(operands.len() + 1);
        check_user_args.push(Arg::Caller(caller.clone()));
        check_user_args.extend(operands);
        Contract {
            id: ContractId::next(),
            caller,
            check_spec,
            asserting_checker,
            check_user_args,
            check_extra_args: extras,
            custom_failure: None,
            custom_message_format: None,
            custom_message_arguments: None,
            custom_message_postfix: None,
            resolution: None,
            raised: None,
        }
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn check_spec(&self) -> CheckSpec {
        self.check_spec
    }

    pub fn asserting_checker(&self) -> CheckerId {
        self.asserting_checker
    }

    pub fn check_user_args(&self) -> &[Arg] {
        &self.check_user_args
    }

    pub fn check_extra_args(&self) -> &[Arg] {
        &self.check_extra_args
    }

    pub fn custom_failure(&self) -> Option<&CustomFailure> {
        self.custom_failure.as_ref()
    }

    pub fn custom_message_format(&self) -> Option<&str> {
        self.custom_message_format.as_deref()
    }

    pub fn custom_message_arguments(&self) -> Option<&ArgumentOrder> {
        self.custom_message_arguments.as_ref()
    }

    pub fn custom_message_postfix(&self) -> Option<&str> {
        self.custom_message_postfix.as_deref()
    }

    /// Raise `failure` instead of the library failure for this contract only.
    pub fn set_custom_failure(&mut self, failure: CustomFailure) {
        self.custom_failure = Some(failure);
    }

    pub fn set_custom_message_format(&mut self, format: impl Into<String>) {
        self.custom_message_format = Some(format.into());
    }

    /// Parses and stores an argument-order descriptor for this contract only.
    pub fn set_custom_message_arguments(&mut self, descriptor: &str) -> Result<(), FailFastError> {
        self.custom_message_arguments = Some(descriptor.parse()?);
        Ok(())
    }

    /// Text appended, after a space, to the final message.
    pub fn set_custom_message_postfix(&mut self, postfix: impl Into<String>) {
        self.custom_message_postfix = Some(postfix.into());
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// The library failure raised for this contract, if any.
    pub fn raised(&self) -> Option<&Arc<FailFastException>> {
        self.raised.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Argument lists for message selection, completed with the fail half.
    pub fn arg_sources<'a>(&'a self, fail_user: &'a [Arg], fail_extra: &'a [Arg]) -> ArgSources<'a> {
        ArgSources {
            check_user: &self.check_user_args,
            check_extra: &self.check_extra_args,
            fail_user,
            fail_extra,
        }
    }

    /// Builds the library failure for `resolution` without recording anything.
    pub fn exception_for(&self, resolution: &Resolution) -> FailFastException {
        FailFastException {
            check_spec: self.check_spec,
            fail_spec: resolution.fail_spec,
            method_id: resolution.method_id.clone(),
            check_user_args: self.check_user_args.clone(),
            check_extra_args: self.check_extra_args.clone(),
            fail_user_args: resolution.fail_user_args.clone(),
            fail_extra_args: resolution.fail_extra_args.clone(),
            message_format: resolution.message_format.clone(),
            message_arguments: resolution.message_arguments.clone(),
            message: resolution.message.clone(),
        }
    }

    /// Records the fail half. Called by the failer that consumed this contract.
    pub fn record_resolution(&mut self, resolution: Resolution, raised: Option<Arc<FailFastException>>) {
        self.resolution = Some(resolution);
        self.raised = raised;
    }
}
