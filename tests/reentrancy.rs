//! End-to-end coverage of the broadcast reentrancy contract: callbacks that
//! add, remove, clear, and re-broadcast on the delegate currently iterating
//! over them, with every observation made through an invocation log.

use std::cell::RefCell;
use std::rc::Rc;

use bindcast::{Delegate, Invoker};

type Log = Rc<RefCell<Vec<&'static str>>>;

struct Recorder {
    log: Log,
    label: &'static str,
}

impl Recorder {
    fn new(log: &Log, label: &'static str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            log: Rc::clone(log),
            label,
        }))
    }

    fn record(&mut self) {
        self.log.borrow_mut().push(self.label);
    }
}

fn recorder_entry(log: &Log, label: &'static str) -> Invoker<(), ()> {
    let log = Rc::clone(log);
    Invoker::callable(move |(): ()| {
        log.borrow_mut().push(label);
    })
}

#[test]
fn entry_removed_before_its_turn_is_never_invoked() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        hook.remove_at(1);
    });
    delegate.add(recorder_entry(&log, "b"));
    delegate.add(recorder_entry(&log, "c"));

    delegate.broadcast(());
    assert_eq!(*log.borrow(), ["a", "c"]);
    assert_eq!(delegate.len(), 2);
    assert!(!delegate.is_broadcasting());
}

#[test]
fn entry_removed_by_probe_before_its_turn_is_never_invoked() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());
    let record = Recorder::record as fn(&mut Recorder);
    let doomed = Recorder::new(&log, "b");

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    let target = Rc::clone(&doomed);
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        assert!(hook.remove(&Invoker::method(&target, record)));
    });
    delegate.add_method(&doomed, record);
    delegate.add(recorder_entry(&log, "c"));

    delegate.broadcast(());
    assert_eq!(*log.borrow(), ["a", "c"]);
}

#[test]
fn self_removal_does_not_skip_the_successor() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        hook.remove_at(0);
    });
    delegate.add(recorder_entry(&log, "b"));

    delegate.broadcast(());
    assert_eq!(*log.borrow(), ["a", "b"]);
    assert_eq!(delegate.len(), 1);

    // Only the successor is left; a second broadcast proves it.
    delegate.broadcast(());
    assert_eq!(*log.borrow(), ["a", "b", "b"]);
}

#[test]
fn entry_inserted_at_the_front_runs_before_the_broadcast_ends() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    let extra = recorder_entry(&log, "x");
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        hook.add_at(0, extra.clone());
    });
    delegate.add(recorder_entry(&log, "b"));

    delegate.broadcast(());

    // The running entry is never re-invoked, and both the inserted entry and
    // the original successor get their turn.
    assert_eq!(*log.borrow(), ["a", "x", "b"]);
    assert_eq!(delegate.len(), 3);
}

#[test]
fn entries_appended_mid_broadcast_run_in_the_same_broadcast() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    let chained = {
        let log = Rc::clone(&log);
        let hook = Rc::clone(&delegate);
        move |(): ()| {
            log.borrow_mut().push("x");
            hook.add(recorder_entry(&log, "y"));
        }
    };
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        hook.add_callable(chained.clone());
    });

    delegate.broadcast(());
    assert_eq!(*log.borrow(), ["a", "x", "y"]);
}

#[test]
fn nested_broadcast_is_a_no_op() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        assert!(hook.is_broadcasting());
        hook.broadcast(());
    });
    delegate.add(recorder_entry(&log, "b"));

    delegate.broadcast(());
    assert_eq!(*log.borrow(), ["a", "b"]);
}

#[test]
fn remove_all_purges_matches_on_both_sides_of_the_live_cursor() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());
    let record = Recorder::record as fn(&mut Recorder);
    let alpha = Recorder::new(&log, "alpha");
    let beta = Recorder::new(&log, "beta");

    delegate.add_method(&alpha, record);
    delegate.add_method(&beta, record);

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    let target = Rc::clone(&alpha);
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("actor");
        assert_eq!(hook.remove_all(&Invoker::method(&target, record)), 2);
    });
    delegate.add_method(&alpha, record);

    delegate.broadcast(());

    // The already-visited alpha and the not-yet-visited one are both gone;
    // the non-matching entries survive.
    assert_eq!(*log.borrow(), ["alpha", "beta", "actor"]);
    assert_eq!(delegate.len(), 2);
    assert!(!delegate.contains(&Invoker::method(&alpha, record)));
    assert!(delegate.contains(&Invoker::method(&beta, record)));
}

#[test]
fn clearing_mid_broadcast_ends_it_and_fresh_entries_still_run() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());

    let sink = Rc::clone(&log);
    let hook = Rc::clone(&delegate);
    delegate.add_callable(move |(): ()| {
        sink.borrow_mut().push("a");
        hook.clear();
        hook.add(recorder_entry(&sink, "w"));
    });
    delegate.add(recorder_entry(&log, "b"));

    delegate.broadcast(());

    // "b" died with the clear; the entry added afterwards got its turn.
    assert_eq!(*log.borrow(), ["a", "w"]);
    assert_eq!(delegate.len(), 1);
    assert!(!delegate.is_broadcasting());
}

#[test]
fn add_unique_during_broadcast_respects_existing_entries() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let delegate: Rc<Delegate> = Rc::new(Delegate::new());
    let record = Recorder::record as fn(&mut Recorder);
    let steady = Recorder::new(&log, "steady");

    let hook = Rc::clone(&delegate);
    let receiver = Rc::clone(&steady);
    delegate.add_callable(move |(): ()| {
        assert!(!hook.add_unique(Invoker::method(&receiver, record)));
    });
    delegate.add_method(&steady, record);

    delegate.broadcast(());
    assert_eq!(delegate.len(), 2);
    assert_eq!(*log.borrow(), ["steady"]);
}
