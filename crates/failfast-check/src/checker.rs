//! The [`Checker`]: condition predicates that stage contracts.
//!
//! Every `is_*` method follows the same steps:
//!
//! 1. validate the caller,
//! 2. refuse if this thread already has a staged contract,
//! 3. evaluate the condition,
//! 4. when it holds, stage a contract carrying the operands and return `true`.
//!
//! Operands are only rendered into the contract when the condition holds.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use failfast_core::{Arg, CallContractor, Caller, CheckSpec, CheckerId, Contract, FailFastError};

use crate::compare::{self, Float};
use crate::config::CheckerConfig;
use crate::defaults::{DefaultSentinels, Enumerated};

/// Arguments a holding condition contributes to its contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    /// Operands, without the caller.
    pub operands: Vec<Arg>,
    /// Values the check derived while evaluating.
    pub extras: Vec<Arg>,
}

impl Evidence {
    pub fn new(operands: Vec<Arg>) -> Self {
        Evidence {
            operands,
            extras: Vec::new(),
        }
    }

    pub fn with_extras(mut self, extras: Vec<Arg>) -> Self {
        self.extras = extras;
        self
    }
}

pub struct Checker {
    id: CheckerId,
    contractor: Arc<CallContractor>,
    config: RwLock<CheckerConfig>,
    defaults: DefaultSentinels,
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("id", &self.id)
            .field("config", &*self.config.read())
            .finish_non_exhaustive()
    }
}

fn require_caller<'c>(caller: Option<&'c Caller>) -> Result<&'c Caller, FailFastError> {
    caller.ok_or(FailFastError::InvalidArgument { name: "caller" })
}

impl Checker {
    pub fn new(contractor: Arc<CallContractor>) -> Self {
        Self::with_config(contractor, CheckerConfig::default())
    }

    pub fn with_config(contractor: Arc<CallContractor>, config: CheckerConfig) -> Self {
        Checker {
            id: CheckerId::next(),
            contractor,
            config: RwLock::new(config.normalized()),
            defaults: DefaultSentinels::new(),
        }
    }

    pub fn id(&self) -> CheckerId {
        self.id
    }

    pub fn contractor(&self) -> &Arc<CallContractor> {
        &self.contractor
    }

    pub fn config(&self) -> CheckerConfig {
        *self.config.read()
    }

    /// Edits the configuration; epsilons are stored as absolute values.
    pub fn update_config(&self, edit: impl FnOnce(&mut CheckerConfig)) {
        let mut config = self.config.write();
        edit(&mut config);
        *config = config.normalized();
    }

    /// Per-type defaults consulted by the default checks.
    pub fn defaults(&self) -> &DefaultSentinels {
        &self.defaults
    }

    /// Runs an arbitrary condition under the check protocol. `condition`
    /// returns the evidence to stage when it holds and `None` otherwise.
    pub fn check<'c>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        spec: CheckSpec,
        condition: impl FnOnce() -> Option<Evidence>,
    ) -> Result<bool, FailFastError> {
        self.try_check(caller, spec, || Ok(condition()))
    }

    /// Like [`check`](Self::check) for conditions that can reject their
    /// inputs. Nothing is evaluated while a contract is pending.
    fn try_check<'c>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        spec: CheckSpec,
        condition: impl FnOnce() -> Result<Option<Evidence>, FailFastError>,
    ) -> Result<bool, FailFastError> {
        let caller = require_caller(caller.into())?;
        self.contractor.ensure_vacant(caller, spec)?;
        let Some(evidence) = condition()? else {
            return Ok(false);
        };
        let contract = Contract::new(caller.clone(), spec, self.id, evidence.operands, evidence.extras);
        tracing::debug!(checker = %self.id, %spec, %caller, "condition holds");
        self.contractor.push(contract)?;
        Ok(true)
    }

    fn check_if<'c>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        spec: CheckSpec,
        holds: impl FnOnce() -> bool,
        evidence: impl FnOnce() -> Evidence,
    ) -> Result<bool, FailFastError> {
        self.check(caller, spec, || holds().then(evidence))
    }

    pub fn is_null<'c, T: ?Sized>(&self, caller: impl Into<Option<&'c Caller>>, reference: Option<&T>) -> Result<bool, FailFastError> {
        self.check_if(caller, CheckSpec::Null, || reference.is_none(), || Evidence::new(vec![Arg::Absent]))
    }

    pub fn is_not_null<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, reference: Option<&T>) -> Result<bool, FailFastError>
    where
        T: fmt::Debug + ?Sized,
    {
        self.check(caller, CheckSpec::NotNull, || reference.map(|r| Evidence::new(vec![Arg::value(r)])))
    }

    /// Mutual equality; two absent operands are equal.
    pub fn is_equals<'c, A, B>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        a: Option<&A>,
        b: Option<&B>,
    ) -> Result<bool, FailFastError>
    where
        A: PartialEq<B> + fmt::Debug + ?Sized,
        B: PartialEq<A> + fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::Equals, || compare::equals(a, b), || operands2(a, b))
    }

    pub fn is_not_equals<'c, A, B>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        a: Option<&A>,
        b: Option<&B>,
    ) -> Result<bool, FailFastError>
    where
        A: PartialEq<B> + fmt::Debug + ?Sized,
        B: PartialEq<A> + fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::NotEquals, || !compare::equals(a, b), || operands2(a, b))
    }

    /// Reference identity by address. Distinct zero-sized values may
    /// share an address and so count as the same.
    pub fn is_same<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, a: Option<&T>, b: Option<&T>) -> Result<bool, FailFastError>
    where
        T: fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::Same, || compare::same(a, b), || operands2(a, b))
    }

    pub fn is_not_same<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, a: Option<&T>, b: Option<&T>) -> Result<bool, FailFastError>
    where
        T: fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::NotSame, || !compare::same(a, b), || operands2(a, b))
    }

    /// Whether `reference` equals the configured default for `T`. An absent
    /// operand is never the default.
    pub fn is_default<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, reference: Option<&T>) -> Result<bool, FailFastError>
    where
        T: PartialEq + Default + Clone + fmt::Debug + Send + Sync + 'static,
    {
        self.check(caller, CheckSpec::Default, || {
            let reference = reference?;
            let default = self.defaults.get::<T>();
            (*reference == default)
                .then(|| Evidence::new(vec![Arg::value(reference)]).with_extras(vec![Arg::value(&default)]))
        })
    }

    /// An absent operand is never the default, so it counts as not-default.
    pub fn is_not_default<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, reference: Option<&T>) -> Result<bool, FailFastError>
    where
        T: PartialEq + Default + Clone + fmt::Debug + Send + Sync + 'static,
    {
        self.check(caller, CheckSpec::NotDefault, || {
            let default = self.defaults.get::<T>();
            let holds = reference.map_or(true, |r| *r != default);
            holds.then(|| Evidence::new(vec![Arg::optional(reference)]).with_extras(vec![Arg::value(&default)]))
        })
    }

    /// Whether `reference` is the default variant of `E`. Absent is `false`.
    pub fn is_enum_default<'c, E: Enumerated>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        reference: Option<&E>,
    ) -> Result<bool, FailFastError> {
        self.try_check(caller, CheckSpec::Default, || {
            let Some(reference) = reference else {
                return Ok(None);
            };
            let default = self.enum_default::<E>()?;
            Ok((*reference == default)
                .then(|| Evidence::new(vec![Arg::value(reference)]).with_extras(vec![Arg::value(&default)])))
        })
    }

    /// Absent operands are rejected as invalid arguments.
    pub fn is_enum_not_default<'c, E: Enumerated>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        reference: Option<&E>,
    ) -> Result<bool, FailFastError> {
        let caller = require_caller(caller.into())?;
        let reference = reference.ok_or(FailFastError::InvalidArgument { name: "reference" })?;
        self.try_check(caller, CheckSpec::NotDefault, || {
            let default = self.enum_default::<E>()?;
            Ok((*reference != default)
                .then(|| Evidence::new(vec![Arg::value(reference)]).with_extras(vec![Arg::value(&default)])))
        })
    }

    fn enum_default<E: Enumerated>(&self) -> Result<E, FailFastError> {
        self.defaults
            .enum_default::<E>()
            .ok_or(FailFastError::InvalidArgument { name: "enumeration variants" })
    }

    pub fn is_less<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, a: Option<&T>, b: Option<&T>) -> Result<bool, FailFastError>
    where
        T: PartialOrd + fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::Less, || compare::less(a, b), || operands2(a, b))
    }

    pub fn is_less_or_equals<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, a: Option<&T>, b: Option<&T>) -> Result<bool, FailFastError>
    where
        T: PartialOrd + fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::LessOrEquals, || compare::less_or_equals(a, b), || operands2(a, b))
    }

    pub fn is_greater<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, a: Option<&T>, b: Option<&T>) -> Result<bool, FailFastError>
    where
        T: PartialOrd + fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::Greater, || compare::greater(a, b), || operands2(a, b))
    }

    pub fn is_greater_or_equals<'c, T>(&self, caller: impl Into<Option<&'c Caller>>, a: Option<&T>, b: Option<&T>) -> Result<bool, FailFastError>
    where
        T: PartialOrd + fmt::Debug + ?Sized,
    {
        self.check_if(caller, CheckSpec::GreaterOrEquals, || compare::greater_or_equals(a, b), || operands2(a, b))
    }

    /// Closed-range membership; `min` and `max` may come in either order.
    pub fn is_inside<'c, T>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        value: Option<&T>,
        min: Option<&T>,
        max: Option<&T>,
    ) -> Result<bool, FailFastError>
    where
        T: PartialOrd + fmt::Debug + ?Sized,
    {
        self.check_if(
            caller,
            CheckSpec::Inside,
            || compare::inside(value, min, max),
            || operands3(value, min, max),
        )
    }

    pub fn is_outside<'c, T>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        value: Option<&T>,
        min: Option<&T>,
        max: Option<&T>,
    ) -> Result<bool, FailFastError>
    where
        T: PartialOrd + fmt::Debug + ?Sized,
    {
        self.check_if(
            caller,
            CheckSpec::Outside,
            || compare::outside(value, min, max),
            || operands3(value, min, max),
        )
    }

    /// Approximate equality with the configured epsilons for `F`.
    pub fn is_equals_almost<'c, F: Float>(&self, caller: impl Into<Option<&'c Caller>>, a: &F, b: &F) -> Result<bool, FailFastError> {
        self.is_equals_almost_with(caller, a, b, None, None)
    }

    /// Approximate equality; `None` epsilons fall back to the configuration.
    pub fn is_equals_almost_with<'c, F: Float>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        a: &F,
        b: &F,
        absolute: Option<F>,
        relative: Option<F>,
    ) -> Result<bool, FailFastError> {
        let (absolute, relative) = self.epsilons(absolute, relative);
        self.check(caller, CheckSpec::EqualsAlmost, || {
            let outcome = compare::equals_almost(a, b, absolute, relative);
            outcome.holds.then(|| almost_evidence(a, b, absolute, relative, outcome.bounds))
        })
    }

    pub fn is_not_equals_almost<'c, F: Float>(&self, caller: impl Into<Option<&'c Caller>>, a: &F, b: &F) -> Result<bool, FailFastError> {
        self.is_not_equals_almost_with(caller, a, b, None, None)
    }

    pub fn is_not_equals_almost_with<'c, F: Float>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        a: &F,
        b: &F,
        absolute: Option<F>,
        relative: Option<F>,
    ) -> Result<bool, FailFastError> {
        let (absolute, relative) = self.epsilons(absolute, relative);
        self.check(caller, CheckSpec::NotEqualsAlmost, || {
            let outcome = compare::not_equals_almost(a, b, absolute, relative);
            outcome.holds.then(|| almost_evidence(a, b, absolute, relative, outcome.bounds))
        })
    }

    fn epsilons<F: Float>(&self, absolute: Option<F>, relative: Option<F>) -> (F, F) {
        let (default_absolute, default_relative) = F::epsilons(&self.config.read());
        (absolute.unwrap_or(default_absolute), relative.unwrap_or(default_relative))
    }

    /// Element-wise equality of two sequences in iteration order. Two
    /// absent sequences are equal.
    pub fn is_sequence_equals<'c, 'a, A, B, IA, IB>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        a: Option<IA>,
        b: Option<IB>,
    ) -> Result<bool, FailFastError>
    where
        IA: IntoIterator<Item = &'a A>,
        IB: IntoIterator<Item = &'a B>,
        A: PartialEq<B> + fmt::Debug + ?Sized + 'a,
        B: PartialEq<A> + fmt::Debug + ?Sized + 'a,
    {
        self.check(caller, CheckSpec::SequenceEquals, || {
            let a: Option<Vec<&A>> = a.map(|a| a.into_iter().collect());
            let b: Option<Vec<&B>> = b.map(|b| b.into_iter().collect());
            match (&a, &b) {
                (None, None) => Some(Evidence::new(vec![Arg::Absent, Arg::Absent]).with_extras(vec![Arg::Absent, Arg::Absent])),
                (Some(left), Some(right)) if compare::first_difference(left, right).is_none() => Some(
                    Evidence::new(vec![Arg::value(left), Arg::value(right)])
                        .with_extras(vec![Arg::value(&left.len()), Arg::text(compare::preview(left))]),
                ),
                _ => None,
            }
        })
    }

    /// Holds when exactly one sequence is absent or the sequences differ.
    pub fn is_sequence_not_equals<'c, 'a, A, B, IA, IB>(
        &self,
        caller: impl Into<Option<&'c Caller>>,
        a: Option<IA>,
        b: Option<IB>,
    ) -> Result<bool, FailFastError>
    where
        IA: IntoIterator<Item = &'a A>,
        IB: IntoIterator<Item = &'a B>,
        A: PartialEq<B> + fmt::Debug + ?Sized + 'a,
        B: PartialEq<A> + fmt::Debug + ?Sized + 'a,
    {
        self.check(caller, CheckSpec::SequenceNotEquals, || {
            let a: Option<Vec<&A>> = a.map(|a| a.into_iter().collect());
            let b: Option<Vec<&B>> = b.map(|b| b.into_iter().collect());
            let operands = vec![sequence_arg(a.as_deref()), sequence_arg(b.as_deref())];
            match (&a, &b) {
                (None, None) => None,
                (Some(left), Some(right)) => compare::first_difference(left, right).map(|difference| {
                    Evidence::new(operands).with_extras(vec![
                        Arg::value(&difference.index),
                        Arg::optional(difference.a),
                        Arg::optional(difference.b),
                    ])
                }),
                _ => Some(Evidence::new(operands).with_extras(vec![Arg::value(&0usize), Arg::Absent, Arg::Absent])),
            }
        })
    }

    pub fn is_true<'c>(&self, caller: impl Into<Option<&'c Caller>>, value: bool) -> Result<bool, FailFastError> {
        self.check_if(caller, CheckSpec::True, || value, || Evidence::new(vec![Arg::value(&value)]))
    }

    pub fn is_false<'c>(&self, caller: impl Into<Option<&'c Caller>>, value: bool) -> Result<bool, FailFastError> {
        self.check_if(caller, CheckSpec::False, || !value, || Evidence::new(vec![Arg::value(&value)]))
    }
}

fn operands2<A, B>(a: Option<&A>, b: Option<&B>) -> Evidence
where
    A: fmt::Debug + ?Sized,
    B: fmt::Debug + ?Sized,
{
    Evidence::new(vec![Arg::optional(a), Arg::optional(b)])
}

fn operands3<T: fmt::Debug + ?Sized>(value: Option<&T>, min: Option<&T>, max: Option<&T>) -> Evidence {
    Evidence::new(vec![Arg::optional(value), Arg::optional(min), Arg::optional(max)])
}

fn sequence_arg<T: fmt::Debug + ?Sized>(items: Option<&[&T]>) -> Arg {
    items.map_or(Arg::Absent, Arg::value)
}

fn almost_evidence<F: Float>(a: &F, b: &F, absolute: F, relative: F, bounds: Option<(F, F)>) -> Evidence {
    let (low, high) = match bounds {
        Some((low, high)) => (Arg::value(&low), Arg::value(&high)),
        None => (Arg::Absent, Arg::Absent),
    };
    Evidence::new(vec![Arg::value(a), Arg::value(b)])
        .with_extras(vec![Arg::value(&absolute), Arg::value(&relative), low, high])
}
