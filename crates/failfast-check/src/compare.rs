//! Comparison algorithms behind the checker.
//!
//! Each function answers whether the named condition holds. Absent operands
//! are modelled as `None`; each algorithm documents how it treats them.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::config::CheckerConfig;

/// Mutual equality. Two absent operands are equal; one absent is not.
pub fn equals<A, B>(a: Option<&A>, b: Option<&B>) -> bool
where
    A: PartialEq<B> + ?Sized,
    B: PartialEq<A> + ?Sized,
{
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b && b == a,
        _ => false,
    }
}

/// Reference identity. Two absent operands are the same.
///
/// Identity is the address. Zero-sized values may share one, so two
/// distinct values of a zero-sized type can compare as the same.
pub fn same<T: ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::addr_eq(a, b),
        _ => false,
    }
}

// Ordering. Two absent operands count as less / less-or-equal but never as
// greater / greater-or-equal. Unordered values (NaN) satisfy nothing.

pub fn less<T: PartialOrd + ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

pub fn less_or_equals<T: PartialOrd + ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a <= b,
        _ => false,
    }
}

pub fn greater<T: PartialOrd + ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

pub fn greater_or_equals<T: PartialOrd + ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a >= b,
        _ => false,
    }
}

fn ordered_bounds<'a, T: PartialOrd + ?Sized>(min: &'a T, max: &'a T) -> (&'a T, &'a T) {
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// Closed-range membership. Bounds given in reverse order are swapped.
/// Any absent operand yields `false`.
pub fn inside<T: PartialOrd + ?Sized>(value: Option<&T>, min: Option<&T>, max: Option<&T>) -> bool {
    let (Some(value), Some(min), Some(max)) = (value, min, max) else {
        return false;
    };
    let (low, high) = ordered_bounds(min, max);
    low <= value && value <= high
}

/// Negation of [`inside`] for present operands. Any absent operand
/// yields `false` here too.
pub fn outside<T: PartialOrd + ?Sized>(value: Option<&T>, min: Option<&T>, max: Option<&T>) -> bool {
    let (Some(value), Some(min), Some(max)) = (value, min, max) else {
        return false;
    };
    let (low, high) = ordered_bounds(min, max);
    value < low || high < value
}

/// Floating-point types supported by approximate comparison.
pub trait Float:
    Copy
    + PartialOrd
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;
    const ONE: Self;

    /// Default `(absolute, relative)` epsilons for this type.
    fn epsilons(config: &CheckerConfig) -> (Self, Self);

    /// `1` for positive, `-1` for negative, the value itself for zero and NaN.
    fn sign(self) -> Self {
        if self > Self::ZERO {
            Self::ONE
        } else if self < Self::ZERO {
            Self::ZERO - Self::ONE
        } else {
            self
        }
    }
}

impl Float for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn epsilons(config: &CheckerConfig) -> (Self, Self) {
        (config.f32_absolute_epsilon, config.f32_relative_epsilon)
    }
}

impl Float for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn epsilons(config: &CheckerConfig) -> (Self, Self) {
        (config.f64_absolute_epsilon, config.f64_relative_epsilon)
    }
}

/// Acceptance window around `a`, widened by the relative epsilon on the
/// side away from zero and by the absolute epsilon on both sides.
pub fn almost_bounds<F: Float>(a: F, absolute: F, relative: F) -> (F, F) {
    let sign = a.sign();
    let low = (F::ONE - sign * relative) * a - absolute;
    let high = (F::ONE + sign * relative) * a + absolute;
    (low, high)
}

/// Result of an approximate comparison. `bounds` is `None` when the
/// operands were the same reference and no window was computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlmostOutcome<F> {
    pub holds: bool,
    pub bounds: Option<(F, F)>,
}

pub fn equals_almost<F: Float>(a: &F, b: &F, absolute: F, relative: F) -> AlmostOutcome<F> {
    if std::ptr::eq(a, b) {
        return AlmostOutcome { holds: true, bounds: None };
    }
    let (low, high) = almost_bounds(*a, absolute, relative);
    AlmostOutcome {
        holds: low <= *b && *b <= high,
        bounds: Some((low, high)),
    }
}

pub fn not_equals_almost<F: Float>(a: &F, b: &F, absolute: F, relative: F) -> AlmostOutcome<F> {
    if std::ptr::eq(a, b) {
        return AlmostOutcome { holds: false, bounds: None };
    }
    let (low, high) = almost_bounds(*a, absolute, relative);
    AlmostOutcome {
        holds: *b < low || high < *b,
        bounds: Some((low, high)),
    }
}

/// First position at which two sequences disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceDifference<'a, A: ?Sized, B: ?Sized> {
    pub index: usize,
    pub a: Option<&'a A>,
    pub b: Option<&'a B>,
}

/// Element-wise mutual equality in iteration order. Returns `None` when
/// the sequences have equal length and equal elements.
pub fn first_difference<'a, A, B>(a: &[&'a A], b: &[&'a B]) -> Option<SequenceDifference<'a, A, B>>
where
    A: PartialEq<B> + ?Sized,
    B: PartialEq<A> + ?Sized,
{
    let shared = a.len().min(b.len());
    let index = (0..shared)
        .find(|&i| !(*a[i] == *b[i] && *b[i] == *a[i]))
        .or_else(|| (a.len() != b.len()).then_some(shared))?;
    Some(SequenceDifference {
        index,
        a: a.get(index).copied(),
        b: b.get(index).copied(),
    })
}

/// Short rendering of a sequence for messages: all elements up to ten,
/// otherwise the first five, an ellipsis and the last four.
pub fn preview<T: fmt::Debug + ?Sized>(items: &[&T]) -> String {
    const FULL: usize = 10;
    const HEAD: usize = 5;
    const TAIL: usize = 4;

    let mut parts: Vec<String> = Vec::new();
    if items.len() <= FULL {
        parts.extend(items.iter().map(|item| format!("{item:?}")));
    } else {
        parts.extend(items[..HEAD].iter().map(|item| format!("{item:?}")));
        parts.push("...".to_owned());
        parts.extend(items[items.len() - TAIL..].iter().map(|item| format!("{item:?}")));
    }
    format!("[{}]", parts.join(", "))
}
