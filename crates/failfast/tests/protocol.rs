//! End-to-end check/fail pairing behaviour.

use std::sync::Arc;
use std::thread;

use failfast::{Arg, Caller, CheckSpec, FailFast, FailMethod, FailSpec, ProtocolViolation};

fn setup() -> (FailFast, Caller) {
    (FailFast::new(), Caller::new("Warehouse"))
}

#[test]
fn check_then_fail_produces_assertion() {
    let (ff, caller) = setup();
    let order: Option<&str> = None;

    assert!(ff.checker().is_null(&caller, order).unwrap());
    let failure = ff.failer().fail_null(&caller, "order", None);

    let exception = failure.as_assertion().expect("library failure");
    assert_eq!(exception.message, "Warehouse: 'order' is None.");
    assert_eq!(exception.check_spec, CheckSpec::Null);
    assert_eq!(exception.fail_spec, FailSpec::Null);
    assert_eq!(exception.check_user_args[0].as_caller(), Some(&caller));
    assert_eq!(exception.fail_user_args[1], Arg::text("order"));
    assert!(!ff.contractor().has_pending());
}

#[test]
fn double_check_is_rejected() {
    let (ff, caller) = setup();
    assert!(ff.checker().is_true(&caller, true).unwrap());

    let err = ff.checker().is_true(&caller, true).unwrap_err();
    assert!(matches!(
        err.protocol_violation(),
        Some(ProtocolViolation::CheckAlreadyPending {
            attempted: CheckSpec::True,
            pending: CheckSpec::True,
            ..
        })
    ));
}

#[test]
fn fail_by_another_caller_is_rejected_and_keeps_contract() {
    let (ff, caller) = setup();
    let intruder = Caller::new("Warehouse");
    assert!(ff.checker().is_false(&caller, false).unwrap());

    let err = ff.failer().fail_false(&intruder, "flag", None);
    assert!(matches!(
        err.protocol_violation(),
        Some(ProtocolViolation::CallerMismatch { .. })
    ));
    assert!(ff.contractor().has_pending());

    assert!(ff.failer().fail_false(&caller, "flag", None).as_assertion().is_some());
}

#[test]
fn fail_of_the_wrong_kind_is_rejected() {
    let (ff, caller) = setup();
    assert!(ff.checker().is_not_null(&caller, Some(&5)).unwrap());

    let err = ff.failer().fail_null(&caller, "count", None);
    assert!(matches!(
        err.protocol_violation(),
        Some(ProtocolViolation::SpecificationMismatch {
            fail_spec: FailSpec::Null,
            expected: CheckSpec::Null,
            pending: CheckSpec::NotNull,
        })
    ));

    let failure = ff.failer().fail_not_null(&caller, "count", None);
    assert_eq!(failure.to_string(), "Warehouse: 'count' is not None, it is 5.");
}

#[test]
fn orphan_fail_is_rejected() {
    let (ff, caller) = setup();
    let err = ff.failer().fail_equals(&caller, "a", "b", None);
    assert!(matches!(
        err.protocol_violation(),
        Some(ProtocolViolation::NoPendingCheck { .. })
    ));
}

#[test]
fn absent_caller_is_an_invalid_argument() {
    let (ff, _) = setup();
    assert!(ff.checker().is_true(None, true).unwrap_err().is_invalid_argument());
    assert!(ff.failer().fail_true(None, "flag", None).is_invalid_argument());
}

#[test]
fn every_check_pairs_with_its_fail() {
    let (ff, caller) = setup();
    let a = 1.0f64;
    let b = 2.0f64;
    let seq = [1, 2];

    let consume = |spec: FailSpec, holds: bool| {
        assert!(holds, "{spec} should hold");
        let method = FailMethod::ALL
            .iter()
            .find(|m| m.spec == spec)
            .expect("every fail spec has a method");
        let names: Vec<Arg> = method.id.matches("_name").map(Arg::text).collect();
        let failure = ff.failer().fail(&caller, method, names);
        let exception = failure.as_assertion().expect("library failure");
        assert_eq!(exception.fail_spec, spec);
        assert_eq!(exception.check_spec, spec.check_spec());
    };

    consume(FailSpec::Null, ff.checker().is_null::<i32>(&caller, None).unwrap());
    consume(FailSpec::NotNull, ff.checker().is_not_null(&caller, Some(&1)).unwrap());
    consume(FailSpec::Equals, ff.checker().is_equals(&caller, Some(&1), Some(&1)).unwrap());
    consume(FailSpec::NotEquals, ff.checker().is_not_equals(&caller, Some(&1), Some(&2)).unwrap());
    consume(FailSpec::Same, ff.checker().is_same(&caller, Some(&a), Some(&a)).unwrap());
    consume(FailSpec::NotSame, ff.checker().is_not_same(&caller, Some(&a), Some(&b)).unwrap());
    consume(FailSpec::Default, ff.checker().is_default(&caller, Some(&0i32)).unwrap());
    consume(FailSpec::NotDefault, ff.checker().is_not_default(&caller, Some(&3i32)).unwrap());
    consume(FailSpec::Less, ff.checker().is_less(&caller, Some(&1), Some(&2)).unwrap());
    consume(FailSpec::LessOrEquals, ff.checker().is_less_or_equals(&caller, Some(&2), Some(&2)).unwrap());
    consume(FailSpec::Greater, ff.checker().is_greater(&caller, Some(&3), Some(&2)).unwrap());
    consume(FailSpec::GreaterOrEquals, ff.checker().is_greater_or_equals(&caller, Some(&2), Some(&2)).unwrap());
    consume(FailSpec::Inside, ff.checker().is_inside(&caller, Some(&2), Some(&1), Some(&3)).unwrap());
    consume(FailSpec::Outside, ff.checker().is_outside(&caller, Some(&5), Some(&1), Some(&3)).unwrap());
    consume(FailSpec::EqualsAlmost, ff.checker().is_equals_almost(&caller, &a, &1.000001).unwrap());
    consume(FailSpec::NotEqualsAlmost, ff.checker().is_not_equals_almost(&caller, &a, &b).unwrap());
    consume(FailSpec::SequenceEquals, ff.checker().is_sequence_equals(&caller, Some(&seq), Some(&seq)).unwrap());
    consume(FailSpec::SequenceNotEquals, ff.checker().is_sequence_not_equals(&caller, Some(&seq), Some(&[1, 3])).unwrap());
    consume(FailSpec::True, ff.checker().is_true(&caller, true).unwrap());
    consume(FailSpec::False, ff.checker().is_false(&caller, false).unwrap());
    assert!(!ff.contractor().has_pending());
}

#[test]
fn contracts_are_isolated_per_thread() {
    let ff = Arc::new(FailFast::new());
    let caller = Caller::new("Shared");
    assert!(ff.checker().is_true(&caller, true).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ff = Arc::clone(&ff);
            let caller = caller.clone();
            thread::spawn(move || {
                assert!(!ff.contractor().has_pending());
                assert!(ff.checker().is_less(&caller, Some(&i), Some(&10)).unwrap());
                let failure = ff.failer().fail_less(&caller, "i", "limit", None);
                failure.to_string()
            })
        })
        .collect();

    let mut messages: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    messages.sort();
    assert_eq!(messages[0], "Shared: 'i'(0) is less than 'limit'(10).");
    assert_eq!(messages.len(), 4);

    assert!(ff.contractor().has_pending());
    ff.failer().fail_true(&caller, "flag", None);
    assert_eq!(ff.contractor().pending_count(), 0);
}

#[test]
fn approximate_equality_defaults() {
    let (ff, caller) = setup();
    assert!(!ff.checker().is_equals_almost(&caller, &0.123, &0.1241).unwrap());
    assert!(ff
        .checker()
        .is_equals_almost_with(&caller, &0.123, &0.1241, Some(0.01), None)
        .unwrap());
    let failure = ff.failer().fail_equals_almost(&caller, "measured", "expected", None);
    let message = failure.to_string();
    assert!(message.starts_with("Warehouse: 'measured'(0.123) is almost equal to 'expected'(0.1241), within ["));
}

#[test]
fn observed_contract_snapshot_via_peek() {
    let (ff, caller) = setup();
    assert!(ff.checker().is_default(&caller, Some(&0u32)).unwrap());
    let contract = ff.contractor().peek(&caller).unwrap();
    assert_eq!(contract.check_spec(), CheckSpec::Default);
    assert_eq!(contract.check_extra_args(), &[Arg::value(&0u32)]);
    assert!(contract.resolution().is_none());
    ff.failer().fail_default(&caller, "slot", None);
}
