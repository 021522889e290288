//! Listeners that record their invocations.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use eventchannel::Listener;
use thiserror::Error;

/// Error returned by [`failing_listener`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TestListenerError(pub String);

/// Shared, ordered record of listener invocations.
///
/// Clones append to the same record. Each call is stored as
/// `"{tag}:{args:?}"`.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call.
    pub fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    /// All calls in invocation order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// The tag of every call in invocation order, arguments stripped.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.split_once(':').map_or(call.as_str(), |(tag, _)| tag).to_owned())
            .collect()
    }

    /// Number of calls recorded for `tag`.
    #[must_use]
    pub fn count(&self, tag: &str) -> usize {
        self.tags().iter().filter(|t| *t == tag).count()
    }

    /// Number of calls recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Listener that records `"{tag}:{args:?}"` into `log`.
#[must_use]
pub fn recording_listener<K, A>(log: &CallLog, tag: &str) -> Listener<K, A>
where
    K: 'static,
    A: fmt::Debug + 'static,
{
    let log = log.clone();
    let tag = tag.to_owned();
    Listener::infallible(move |_, args| log.record(format!("{tag}:{args:?}")))
}

/// Listener that records like [`recording_listener`] and then fails with
/// [`TestListenerError`].
#[must_use]
pub fn failing_listener<K, A>(log: &CallLog, tag: &str, message: &str) -> Listener<K, A>
where
    K: 'static,
    A: fmt::Debug + 'static,
{
    let log = log.clone();
    let tag = tag.to_owned();
    let message = message.to_owned();
    Listener::new(move |_, args| {
        log.record(format!("{tag}:{args:?}"));
        Err(TestListenerError(message.clone()).into())
    })
}
