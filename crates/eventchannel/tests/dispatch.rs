//! Dispatch order, once semantics and re-entrant mutation during `emit`.

#![allow(clippy::arithmetic_side_effects)]

use std::cell::Cell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use eventchannel::{ChannelError, EventChannel, Listener};
use eventchannel_test::{
    CallLog, TestListenerError, failing_listener, recording_listener, setup_test_logging,
};

type Channel = EventChannel<&'static str, i32>;

#[test]
fn test_emit_without_list_returns_false() {
    let channel = Channel::new();
    assert!(!channel.emit("never", &1).unwrap());
    assert!(channel.events().is_empty());
}

#[test]
fn test_emit_on_empty_present_list_returns_true() {
    let log = CallLog::new();
    let channel = Channel::new();
    let f = recording_listener(&log, "f");
    channel.on("x", f.clone()).unwrap().off("x", &f);

    assert!(channel.listeners("x").unwrap().is_empty());
    assert!(channel.emit("x", &1).unwrap());
    assert!(log.is_empty());
}

#[test]
fn test_once_between_regular_listeners() {
    setup_test_logging("eventchannel=trace");
    let log = CallLog::new();
    let channel = Channel::new();
    channel
        .on("x", recording_listener(&log, "f1"))
        .unwrap()
        .once("x", recording_listener(&log, "f2"))
        .unwrap()
        .on("x", recording_listener(&log, "f3"))
        .unwrap();

    channel.emit("x", &1).unwrap();
    assert_eq!(log.calls(), vec!["f1:1", "f2:1", "f3:1"]);

    log.clear();
    channel.emit("x", &2).unwrap();
    assert_eq!(log.calls(), vec!["f1:2", "f3:2"]);
}

#[test]
fn test_once_invoked_with_all_arguments_exactly_once() {
    let log = CallLog::new();
    let channel: EventChannel<&'static str, (&'static str, &'static str)> = EventChannel::new();
    channel.once("x", recording_listener(&log, "f")).unwrap();

    channel.emit("x", &("a", "b")).unwrap();
    channel.emit("x", &("a", "b")).unwrap();

    assert_eq!(log.calls(), vec!["f:(\"a\", \"b\")"]);
    assert!(channel.listeners("x").unwrap().is_empty());
}

#[test]
fn test_mixed_once_and_regular_entries() {
    let log = CallLog::new();
    let channel = Channel::with_max_listeners(100).unwrap();

    let mut expected_first = Vec::new();
    let mut expected_second = Vec::new();
    for i in 0..100 {
        let tag = format!("l{}", i % 13);
        if i % 3 == 0 {
            channel.once("x", recording_listener(&log, &tag)).unwrap();
        } else {
            channel.on("x", recording_listener(&log, &tag)).unwrap();
            expected_second.push(tag.clone());
        }
        expected_first.push(tag);
    }

    channel.emit("x", &0).unwrap();
    assert_eq!(log.tags(), expected_first);

    log.clear();
    channel.emit("x", &0).unwrap();
    assert_eq!(log.tags(), expected_second);
    assert_eq!(channel.listener_count("x"), expected_second.len());
}

#[test]
fn test_listeners_receive_emitting_channel() {
    let channel = Channel::new();
    let expected: *const Channel = &channel;
    let hits = Rc::new(Cell::new(0_u32));

    let probe = {
        let hits = Rc::clone(&hits);
        Listener::infallible(move |ch: &Channel, _: &i32| {
            assert!(std::ptr::eq(ch, expected));
            hits.set(hits.get().saturating_add(1));
        })
    };

    channel
        .on("this", probe.clone())
        .unwrap()
        .once("this", probe)
        .unwrap();
    channel.emit("this", &0).unwrap();

    assert_eq!(hits.get(), 2);
}

#[test]
fn test_listener_added_during_emit_runs_in_same_pass() {
    let log = CallLog::new();
    let channel = Channel::new();
    let late = recording_listener(&log, "late");

    let adder = {
        let log = log.clone();
        Listener::new(move |ch: &Channel, n: &i32| {
            log.record(format!("adder:{n}"));
            if ch.listener_count("x") == 1 {
                ch.on("x", late.clone())?;
            }
            Ok(())
        })
    };
    channel.on("x", adder).unwrap();

    channel.emit("x", &1).unwrap();
    assert_eq!(log.calls(), vec!["adder:1", "late:1"]);
    assert_eq!(channel.listener_count("x"), 2);
}

#[test]
fn test_removing_later_listener_during_emit_skips_it() {
    let log = CallLog::new();
    let channel = Channel::new();
    let b = recording_listener(&log, "b");

    let remover = {
        let log = log.clone();
        let b = b.clone();
        Listener::infallible(move |ch: &Channel, n: &i32| {
            log.record(format!("remover:{n}"));
            ch.off("x", &b);
        })
    };

    channel
        .on("x", recording_listener(&log, "a"))
        .unwrap()
        .on("x", remover)
        .unwrap()
        .on("x", b)
        .unwrap()
        .on("x", recording_listener(&log, "c"))
        .unwrap();

    channel.emit("x", &1).unwrap();
    assert_eq!(log.tags(), vec!["a", "remover", "c"]);
}

#[test]
fn test_removing_earlier_listener_during_emit_shifts_cursor() {
    let log = CallLog::new();
    let channel = Channel::new();
    let a = recording_listener(&log, "a");

    let remover = {
        let log = log.clone();
        let a = a.clone();
        Listener::infallible(move |ch: &Channel, n: &i32| {
            log.record(format!("remover:{n}"));
            ch.off("x", &a);
        })
    };

    channel
        .on("x", a)
        .unwrap()
        .on("x", remover)
        .unwrap()
        .on("x", recording_listener(&log, "b"))
        .unwrap();

    // `b` slides into the slot the cursor already passed.
    channel.emit("x", &1).unwrap();
    assert_eq!(log.tags(), vec!["a", "remover"]);

    log.clear();
    channel.emit("x", &2).unwrap();
    assert_eq!(log.tags(), vec!["remover", "b"]);
}

#[test]
fn test_all_off_during_emit_finishes_detached_list() {
    let log = CallLog::new();
    let channel = Channel::new();

    let clearer = {
        let log = log.clone();
        Listener::new(move |ch: &Channel, n: &i32| {
            log.record(format!("clearer:{n}"));
            ch.all_off("x");
            ch.on("x", recording_listener(&log, "fresh"))?;
            Ok(())
        })
    };

    channel
        .on("x", recording_listener(&log, "a"))
        .unwrap()
        .once("x", clearer)
        .unwrap()
        .on("x", recording_listener(&log, "b"))
        .unwrap();

    channel.emit("x", &1).unwrap();
    assert_eq!(log.tags(), vec!["a", "clearer", "b"]);
    assert_eq!(channel.listener_count("x"), 1);

    log.clear();
    channel.emit("x", &2).unwrap();
    assert_eq!(log.calls(), vec!["fresh:2"]);
}

#[test]
fn test_nested_emit_of_other_event() {
    let log = CallLog::new();
    let channel = Channel::new();
    channel.on("inner", recording_listener(&log, "inner")).unwrap();

    let relay = {
        let log = log.clone();
        Listener::new(move |ch: &Channel, n: &i32| {
            log.record(format!("relay:{n}"));
            ch.emit("inner", &n.saturating_mul(10))?;
            Ok(())
        })
    };
    channel
        .once("outer", relay)
        .unwrap()
        .on("outer", recording_listener(&log, "after"))
        .unwrap();

    assert!(channel.emit("outer", &2).unwrap());
    assert_eq!(log.calls(), vec!["relay:2", "inner:20", "after:2"]);
    assert_eq!(channel.listener_count("outer"), 1);
}

#[test]
fn test_failing_listener_aborts_pass() {
    let log = CallLog::new();
    let channel = Channel::new();
    channel
        .on("x", recording_listener(&log, "a"))
        .unwrap()
        .on("x", failing_listener(&log, "bad", "boom"))
        .unwrap()
        .on("x", recording_listener(&log, "c"))
        .unwrap();

    match channel.emit("x", &1).unwrap_err() {
        ChannelError::ListenerFailed { event, source } => {
            assert_eq!(event, "\"x\"");
            assert_eq!(
                source.downcast_ref::<TestListenerError>(),
                Some(&TestListenerError("boom".to_string()))
            );
        },
        other => panic!("expected ListenerFailed, got {other:?}"),
    }
    assert_eq!(log.tags(), vec!["a", "bad"]);
}

#[test]
fn test_failing_once_listener_stays_registered() {
    let log = CallLog::new();
    let channel = Channel::new();
    channel
        .once("x", failing_listener(&log, "bad", "boom"))
        .unwrap();

    assert!(channel.emit("x", &1).is_err());
    assert!(channel.emit("x", &2).is_err());
    assert_eq!(channel.listener_count("x"), 1);
    assert_eq!(log.calls(), vec!["bad:1", "bad:2"]);
}

#[test]
fn test_panicking_listener_unwinds_and_leaves_channel_usable() {
    let log = CallLog::new();
    let channel = Channel::new();
    channel
        .on("x", Listener::infallible(|_, _| panic!("listener panicked")))
        .unwrap()
        .on("x", recording_listener(&log, "after"))
        .unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| channel.emit("x", &1)));
    assert!(result.is_err());
    assert!(log.is_empty());

    channel.all_off("x");
    channel.on("x", recording_listener(&log, "f")).unwrap();
    channel.emit("x", &2).unwrap();
    assert_eq!(log.calls(), vec!["f:2"]);
}
