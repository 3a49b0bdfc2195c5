//! Failer observer registration and notification.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use failfast::{Caller, Contract, FailFast, FailFastError, FailSpec, Failer, FailerObserver, ProtocolViolation};

type Log = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Arc<Self> {
        Arc::new(Recorder {
            name,
            log: Arc::clone(log),
        })
    }
}

impl FailerObserver for Recorder {
    fn notify_failure_before_raise(&self, _failer: &Failer, contract: &Contract, failure: &FailFastError) {
        let fail_spec = contract.resolution().map(|r| r.fail_spec);
        assert_eq!(fail_spec, Some(FailSpec::True));
        self.log.lock().unwrap().push(format!("{}: {}", self.name, failure));
    }
}

fn setup() -> (FailFast, Caller, Log) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    (FailFast::new(), Caller::new("Scheduler"), Log::default())
}

fn trip(ff: &FailFast, caller: &Caller) -> FailFastError {
    assert!(ff.checker().is_true(caller, true).unwrap());
    ff.failer().fail_true(caller, "overdue", None)
}

#[test]
fn observers_run_in_registration_order() {
    let (ff, caller, log) = setup();
    ff.failer().register_observer(Recorder::new("first", &log)).unwrap();
    ff.failer().register_observer(Recorder::new("second", &log)).unwrap();

    trip(&ff, &caller);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "first: Scheduler: 'overdue' is true.".to_owned(),
            "second: Scheduler: 'overdue' is true.".to_owned(),
        ]
    );
}

#[test]
fn same_observer_cannot_register_twice() {
    let (ff, _, log) = setup();
    let recorder = Recorder::new("only", &log);
    let key = ff.failer().register_observer(recorder.clone()).unwrap();

    let err = ff.failer().register_observer(recorder.clone()).unwrap_err();
    assert_eq!(
        err.protocol_violation(),
        Some(&ProtocolViolation::ObserverAlreadyRegistered { key })
    );
    assert_eq!(ff.failer().observers().len(), 1);
}

#[test]
fn unregister_requires_the_matching_key() {
    let (ff, caller, log) = setup();
    let first = Recorder::new("first", &log);
    let second = Recorder::new("second", &log);
    let first_key = ff.failer().register_observer(first.clone()).unwrap();
    let second_key = ff.failer().register_observer(second.clone()).unwrap();

    let err = ff.failer().unregister_observer(&first, second_key).unwrap_err();
    assert_eq!(
        err.protocol_violation(),
        Some(&ProtocolViolation::RegistrationKeyMismatch { given: second_key })
    );

    ff.failer().unregister_observer(&first, first_key).unwrap();
    let err = ff.failer().unregister_observer(&first, first_key).unwrap_err();
    assert_eq!(err.protocol_violation(), Some(&ProtocolViolation::ObserverNotRegistered));

    trip(&ff, &caller);
    assert_eq!(log.lock().unwrap().len(), 1);
    assert!(log.lock().unwrap()[0].starts_with("second: "));
}

#[test]
fn closures_observe_custom_failures_too() {
    #[derive(Debug, Default, thiserror::Error)]
    #[error("job cancelled")]
    struct JobCancelled;

    let (ff, caller, log) = setup();
    let sink = Arc::clone(&log);
    ff.failer()
        .register_observer(Arc::new(move |_: &Failer, _: &Contract, failure: &FailFastError| {
            sink.lock().unwrap().push(failure.to_string());
        }))
        .unwrap();
    ff.failer()
        .customizer()
        .register_custom_failure(failfast::FailMethod::TRUE.id, failfast::CustomFailure::of::<JobCancelled>())
        .unwrap();

    let failure = trip(&ff, &caller);
    assert!(failure.downcast_custom::<JobCancelled>().is_some());
    assert_eq!(*log.lock().unwrap(), vec!["job cancelled".to_owned()]);
}

#[test]
fn protocol_violations_are_not_observed() {
    let (ff, caller, log) = setup();
    ff.failer().register_observer(Recorder::new("watcher", &log)).unwrap();

    let err = ff.failer().fail_true(&caller, "overdue", None);
    assert!(err.is_protocol_violation());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn observer_may_unregister_itself_while_notified() {
    struct OneShot {
        key: Mutex<Option<failfast::RegistrationKey>>,
        me: Mutex<Option<Arc<OneShot>>>,
        hits: Mutex<u32>,
    }

    impl FailerObserver for OneShot {
        fn notify_failure_before_raise(&self, failer: &Failer, _: &Contract, _: &FailFastError) {
            *self.hits.lock().unwrap() += 1;
            let me = self.me.lock().unwrap().take();
            let key = self.key.lock().unwrap().take();
            if let (Some(me), Some(key)) = (me, key) {
                failer.unregister_observer(&me, key).unwrap();
            }
        }
    }

    let (ff, caller, _) = setup();
    let observer = Arc::new(OneShot {
        key: Mutex::new(None),
        me: Mutex::new(None),
        hits: Mutex::new(0),
    });
    let key = ff.failer().register_observer(observer.clone()).unwrap();
    *observer.key.lock().unwrap() = Some(key);
    *observer.me.lock().unwrap() = Some(Arc::clone(&observer));

    trip(&ff, &caller);
    trip(&ff, &caller);
    assert_eq!(*observer.hits.lock().unwrap(), 1);
    assert!(ff.failer().observers().is_empty());
}

#[test]
fn panicking_observer_leaves_the_failer_consistent() {
    struct Crashing;

    impl FailerObserver for Crashing {
        fn notify_failure_before_raise(&self, _: &Failer, _: &Contract, _: &FailFastError) {
            panic!("observer crashed");
        }
    }

    let (ff, caller, _) = setup();
    let observer = Arc::new(Crashing);
    let key = ff.failer().register_observer(observer.clone()).unwrap();

    assert!(ff.checker().is_true(&caller, true).unwrap());
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| ff.failer().fail_true(&caller, "overdue", None)));
    assert!(outcome.is_err());
    assert!(!ff.contractor().has_pending());
    let recorded = ff.failer().fail_fast_exception().unwrap();
    assert_eq!(recorded.message, "Scheduler: 'overdue' is true.");

    ff.failer().unregister_observer(&observer, key).unwrap();
    let failure = trip(&ff, &caller);
    assert!(failure.as_assertion().is_some());
}
