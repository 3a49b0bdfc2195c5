//! The [`Failer`]: turns a staged contract into a failure.
//!
//! `fail` pops the caller's contract, resolves the failure type, message
//! format and argument order (contract, then registry, then the method's
//! default), renders the message, records the resolution on the contract,
//! notifies observers and returns the failure for the caller to propagate.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use failfast_core::{
    message, Arg, ArgumentOrder, CallContractor, Caller, FailFastError, FailFastException, FailerId,
    RegistrationKey, Resolution,
};

use crate::config::FailerCustomizations;
use crate::customizer::FailerCustomizer;
use crate::methods::FailMethod;
use crate::observer::{FailerObserver, ObserverRegistry};

#[derive(Debug, Clone, Copy)]
enum Customized {
    Format,
    Arguments,
}

pub struct Failer {
    id: FailerId,
    contractor: Arc<CallContractor>,
    customizer: FailerCustomizer,
    observers: ObserverRegistry,
    last_raised: Mutex<Option<Arc<FailFastException>>>,
}

impl fmt::Debug for Failer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failer")
            .field("id", &self.id)
            .field("customizer", &self.customizer)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

impl Failer {
    pub fn new(contractor: Arc<CallContractor>) -> Self {
        Failer {
            id: FailerId::next(),
            contractor,
            customizer: FailerCustomizer::new(),
            observers: ObserverRegistry::new(),
            last_raised: Mutex::new(None),
        }
    }

    pub fn id(&self) -> FailerId {
        self.id
    }

    pub fn contractor(&self) -> &Arc<CallContractor> {
        &self.contractor
    }

    /// Per-method failure type, format and argument-order registries.
    pub fn customizer(&self) -> &FailerCustomizer {
        &self.customizer
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn register_observer(&self, observer: Arc<dyn FailerObserver>) -> Result<RegistrationKey, FailFastError> {
        self.observers.register(observer)
    }

    pub fn unregister_observer<O>(&self, observer: &Arc<O>, key: RegistrationKey) -> Result<(), FailFastError>
    where
        O: FailerObserver + ?Sized,
    {
        self.observers.unregister(observer, key)
    }

    /// The most recent library failure this failer produced. Cleared when
    /// a custom failure type is raised instead.
    pub fn fail_fast_exception(&self) -> Option<Arc<FailFastException>> {
        self.last_raised.lock().clone()
    }

    /// Registers every format and argument-order override in
    /// `customizations`, all or nothing. Descriptors are parsed before
    /// anything is registered; if a registration then conflicts, the entries
    /// this call already registered are removed again before the error is
    /// returned.
    pub fn apply_customizations(&self, customizations: &FailerCustomizations) -> Result<(), FailFastError> {
        for method in customizations.methods.values() {
            if let Some(descriptor) = &method.message_arguments {
                descriptor.parse::<ArgumentOrder>()?;
            }
        }
        let mut applied = Vec::new();
        if let Err(err) = self.register_customizations(customizations, &mut applied) {
            self.roll_back(&applied);
            return Err(err);
        }
        tracing::info!(failer = %self.id, methods = customizations.methods.len(), "customizations applied");
        Ok(())
    }

    fn register_customizations<'a>(
        &self,
        customizations: &'a FailerCustomizations,
        applied: &mut Vec<(&'a str, Customized)>,
    ) -> Result<(), FailFastError> {
        for (method_id, method) in &customizations.methods {
            if let Some(format) = &method.message_format {
                self.customizer.register_custom_message_format(method_id, format.clone())?;
                applied.push((method_id, Customized::Format));
            }
            if let Some(descriptor) = &method.message_arguments {
                self.customizer.register_custom_message_arguments(method_id, descriptor)?;
                applied.push((method_id, Customized::Arguments));
            }
        }
        Ok(())
    }

    fn roll_back(&self, applied: &[(&str, Customized)]) {
        for &(method_id, kind) in applied.iter().rev() {
            let removed = match kind {
                Customized::Format => self.customizer.unregister_custom_message_format(method_id).map(drop),
                Customized::Arguments => self.customizer.unregister_custom_message_arguments(method_id).map(drop),
            };
            if let Err(err) = removed {
                tracing::warn!(failer = %self.id, method = method_id, %err, "customization not rolled back");
            }
        }
    }

    /// Consumes the caller's contract and returns the failure to propagate.
    ///
    /// `user_args` are the fail method's own arguments (reference names,
    /// optional message); the caller is prepended as fail-user argument 0.
    /// Protocol violations are returned in place of the failure and leave
    /// the contract staged.
    pub fn fail<'c>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        method: &FailMethod,
        user_args: Vec<Arg>,
    ) -> FailFastError {
        match self.raise(caller.into(), method, user_args) {
            Ok(failure) | Err(failure) => failure,
        }
    }

    fn raise(&self, caller: Option<&Caller>, method: &FailMethod, user_args: Vec<Arg>) -> Result<FailFastError, FailFastError> {
        let caller = caller.ok_or(FailFastError::InvalidArgument { name: "caller" })?;
        let mut contract = self.contractor.pop(caller, method.spec)?;

        let failure_type = match contract.custom_failure() {
            Some(custom) => Some(custom.clone()),
            None => self.customizer.failure_types().lookup(method.id),
        };
        let message_format = match contract.custom_message_format() {
            Some(format) => format.to_owned(),
            None => self
                .customizer
                .message_formats()
                .lookup(method.id)
                .unwrap_or_else(|| method.format.to_owned()),
        };
        let message_arguments = match contract.custom_message_arguments() {
            Some(order) => order.clone(),
            None => match self.customizer.message_arguments().lookup(method.id) {
                Some(order) => order,
                None => method.default_arguments()?,
            },
        };

        let mut fail_user_args = Vec::with_capacity(user_args.len() + 1);
        fail_user_args.push(Arg::Caller(caller.clone()));
        fail_user_args.extend(user_args);
        let fail_extra_args: Vec<Arg> = Vec::new();

        let rendered = message_arguments.select(&contract.arg_sources(&fail_user_args, &fail_extra_args));
        let mut text = message::render(&message_format, &rendered);
        if let Some(postfix) = contract.custom_message_postfix() {
            text.push(' ');
            text.push_str(postfix);
        }

        let resolution = Resolution {
            fail_spec: method.spec,
            method_id: method.id.to_owned(),
            fail_user_args,
            fail_extra_args,
            message_format,
            message_arguments,
            failure_type: failure_type.clone(),
            message: text,
        };

        let failure = match failure_type {
            Some(custom) => {
                *self.last_raised.lock() = None;
                contract.record_resolution(resolution, None);
                FailFastError::Custom(custom.instantiate())
            }
            None => {
                let exception = Arc::new(contract.exception_for(&resolution));
                *self.last_raised.lock() = Some(Arc::clone(&exception));
                contract.record_resolution(resolution, Some(Arc::clone(&exception)));
                FailFastError::Assertion(exception)
            }
        };

        tracing::debug!(failer = %self.id, contract = %contract.id(), method = method.id, "failure raised");
        self.observers.notify(self, &contract, &failure);
        Ok(failure)
    }

    fn fail_named<'c>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        plain: &FailMethod,
        with_message: &FailMethod,
        names: &[&str],
        message: Option<&str>,
    ) -> FailFastError {
        let mut user_args: Vec<Arg> = names.iter().map(|&name| Arg::text(name)).collect();
        let method = match message {
            Some(message) => {
                user_args.push(Arg::text(message));
                with_message
            }
            None => plain,
        };
        self.fail(caller, method, user_args)
    }

    pub fn fail_null<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::NULL, &FailMethod::NULL_MESSAGE, &[reference_name], message)
    }

    pub fn fail_not_null<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::NOT_NULL, &FailMethod::NOT_NULL_MESSAGE, &[reference_name], message)
    }

    pub fn fail_equals<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::EQUALS, &FailMethod::EQUALS_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_not_equals<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::NOT_EQUALS, &FailMethod::NOT_EQUALS_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_same<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::SAME, &FailMethod::SAME_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_not_same<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::NOT_SAME, &FailMethod::NOT_SAME_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_default<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::DEFAULT, &FailMethod::DEFAULT_MESSAGE, &[reference_name], message)
    }

    pub fn fail_not_default<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::NOT_DEFAULT, &FailMethod::NOT_DEFAULT_MESSAGE, &[reference_name], message)
    }

    pub fn fail_less<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::LESS, &FailMethod::LESS_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_less_or_equals<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::LESS_OR_EQUALS, &FailMethod::LESS_OR_EQUALS_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_greater<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::GREATER, &FailMethod::GREATER_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_greater_or_equals<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(
            caller,
            &FailMethod::GREATER_OR_EQUALS,
            &FailMethod::GREATER_OR_EQUALS_MESSAGE,
            &[a_name, b_name],
            message,
        )
    }

    pub fn fail_inside<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::INSIDE, &FailMethod::INSIDE_MESSAGE, &[reference_name], message)
    }

    pub fn fail_outside<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::OUTSIDE, &FailMethod::OUTSIDE_MESSAGE, &[reference_name], message)
    }

    pub fn fail_equals_almost<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::EQUALS_ALMOST, &FailMethod::EQUALS_ALMOST_MESSAGE, &[a_name, b_name], message)
    }

    pub fn fail_not_equals_almost<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(
            caller,
            &FailMethod::NOT_EQUALS_ALMOST,
            &FailMethod::NOT_EQUALS_ALMOST_MESSAGE,
            &[a_name, b_name],
            message,
        )
    }

    pub fn fail_sequence_equals<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(
            caller,
            &FailMethod::SEQUENCE_EQUALS,
            &FailMethod::SEQUENCE_EQUALS_MESSAGE,
            &[a_name, b_name],
            message,
        )
    }

    pub fn fail_sequence_not_equals<'c>(&self, caller: impl Into<Option<&'c Caller>>, a_name: &str, b_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(
            caller,
            &FailMethod::SEQUENCE_NOT_EQUALS,
            &FailMethod::SEQUENCE_NOT_EQUALS_MESSAGE,
            &[a_name, b_name],
            message,
        )
    }

    pub fn fail_true<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::TRUE, &FailMethod::TRUE_MESSAGE, &[reference_name], message)
    }

    pub fn fail_false<'c>(&self, caller: impl Into<Option<&'c Caller>>, reference_name: &str, message: Option<&str>) -> FailFastError {
        self.fail_named(caller, &FailMethod::FALSE, &FailMethod::FALSE_MESSAGE, &[reference_name], message)
    }
}
