//! Event channel with per-event listener lists and synchronous dispatch.

use std::borrow::Borrow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::ChannelConfig;
use crate::error::{ChannelError, ChannelResult};
use crate::listener::{Listener, ListenerEntry, ListenerList};

/// Default number of listeners allowed per event.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Registry of listeners keyed by event, dispatched synchronously.
///
/// `K` is the event key and `A` the payload handed to listeners on
/// [`emit`](Self::emit). Every operation takes `&self`, so a listener may
/// register, remove or emit on the channel it was invoked from. The channel
/// is single-threaded and holds no borrow of its state while a listener
/// runs.
///
/// # Example
///
/// ```rust
/// use eventchannel::{EventChannel, Listener};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// # fn main() -> Result<(), eventchannel::ChannelError> {
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&seen);
///
/// let channel: EventChannel<&str, i32> = EventChannel::new();
/// let record = Listener::infallible(move |_, n: &i32| log.borrow_mut().push(*n));
/// channel.once("tick", record)?;
///
/// assert!(channel.emit("tick", &1)?);
/// assert!(channel.emit("tick", &2)?);
/// assert_eq!(*seen.borrow(), vec![1]);
/// # Ok(())
/// # }
/// ```
pub struct EventChannel<K, A = ()> {
    max_listeners: Cell<usize>,
    events: RefCell<HashMap<K, ListenerList<K, A>>>,
}

impl<K, A> EventChannel<K, A> {
    /// Create an empty channel with [`DEFAULT_MAX_LISTENERS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_listeners: Cell::new(DEFAULT_MAX_LISTENERS),
            events: RefCell::new(HashMap::new()),
        }
    }

    /// Create an empty channel with a custom per-event capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidConfiguration`] if `max` is zero.
    pub fn with_max_listeners(max: usize) -> ChannelResult<Self> {
        let channel = Self::new();
        channel.set_max_listeners(max)?;
        Ok(channel)
    }

    /// Create an empty channel from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidConfiguration`] if the configured
    /// capacity is zero.
    pub fn from_config(config: &ChannelConfig) -> ChannelResult<Self> {
        Self::with_max_listeners(config.max_listeners)
    }

    /// Maximum number of listeners per event.
    #[must_use]
    pub fn max_listeners(&self) -> usize {
        self.max_listeners.get()
    }

    /// Change the per-event capacity.
    ///
    /// Lists that are already longer than `max` are left as they are; only
    /// later registrations are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidConfiguration`] if `max` is zero.
    pub fn set_max_listeners(&self, max: usize) -> ChannelResult<()> {
        if max == 0 {
            return Err(ChannelError::InvalidConfiguration {
                field: "max_listeners",
                message: "must be a positive integer".to_string(),
            });
        }
        self.max_listeners.set(max);
        Ok(())
    }
}

impl<K, A> EventChannel<K, A>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Append `listener` to the list for `event_name`.
    ///
    /// The same listener may be added more than once; each entry is invoked
    /// on every emit.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::CapacityExceeded`] if the list already holds
    /// [`max_listeners`](Self::max_listeners) entries. Nothing is added.
    pub fn on(&self, event_name: K, listener: Listener<K, A>) -> ChannelResult<&Self> {
        self.register(event_name, ListenerEntry::new(listener, false))?;
        Ok(self)
    }

    /// Append a listener that is removed right after its next invocation.
    ///
    /// The channel registers a new wrapper around `listener`. Passing the
    /// original handle to [`off`](Self::off) does not remove it; use
    /// [`all_off`](Self::all_off) or the wrapper exposed by
    /// [`listeners`](Self::listeners).
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::CapacityExceeded`] under the same rule as
    /// [`on`](Self::on).
    pub fn once(&self, event_name: K, listener: Listener<K, A>) -> ChannelResult<&Self>
    where
        K: 'static,
        A: 'static,
    {
        self.register(event_name, ListenerEntry::new(listener.forwarding(), true))?;
        Ok(self)
    }

    fn register(&self, event_name: K, entry: ListenerEntry<K, A>) -> ChannelResult<()> {
        let max = self.max_listeners.get();
        let mut events = self.events.borrow_mut();
        let list = events.entry(event_name.clone()).or_default();

        let count = list.len();
        if count >= max {
            debug!(event = ?event_name, count, max, "Listener rejected, capacity reached");
            return Err(ChannelError::CapacityExceeded {
                event: format!("{event_name:?}"),
                count,
                max,
            });
        }

        let once = entry.is_once();
        list.push(entry);
        debug!(event = ?event_name, once, count = count.saturating_add(1), "Listener registered");
        Ok(())
    }

    /// Remove the most recently added entry for `listener`.
    ///
    /// At most one entry is removed per call. Does nothing if the event has
    /// no list or the listener is not in it.
    pub fn off<Q>(&self, event_name: &Q, listener: &Listener<K, A>) -> &Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        if let Some(list) = self.listeners(event_name) {
            if list.remove_last(listener) {
                debug!(event = ?event_name, remaining = list.len(), "Listener removed");
            }
        }
        self
    }

    /// Drop the whole list for `event_name`, once-listeners included.
    ///
    /// The event becomes absent, as if nothing had ever been registered.
    pub fn all_off<Q>(&self, event_name: &Q) -> &Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let removed = self.events.borrow_mut().remove(event_name);
        if let Some(list) = removed {
            debug!(event = ?event_name, discarded = list.len(), "All listeners removed");
        }
        self
    }

    /// Invoke every listener for `event_name` in registration order.
    ///
    /// Listeners are visited by position over the live list captured when the
    /// call starts. A once-entry is removed from its slot right after it runs
    /// and the cursor stays put, so the entry shifted into that slot runs
    /// next. Entries appended while dispatching are reached in the same pass.
    ///
    /// Returns `Ok(true)` if the event had a list, even an empty one, and
    /// `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::ListenerFailed`] as soon as a listener returns
    /// an error. Remaining listeners are skipped and the failing entry stays
    /// registered.
    pub fn emit<Q>(&self, event_name: &Q, args: &A) -> ChannelResult<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let Some(list) = self.listeners(event_name) else {
            trace!(event = ?event_name, "No listeners for event");
            return Ok(false);
        };

        trace!(event = ?event_name, listener_count = list.len(), "Emitting event");

        let mut index: usize = 0;
        while let Some(entry) = list.get(index) {
            trace!(event = ?event_name, index, once = entry.is_once(), "Invoking listener");

            if let Err(source) = entry.listener().call(self, args) {
                debug!(event = ?event_name, index, error = %source, "Listener failed, dispatch aborted");
                return Err(ChannelError::ListenerFailed {
                    event: format!("{event_name:?}"),
                    source,
                });
            }

            if entry.is_once() {
                list.remove_at(index);
            } else {
                index = index.saturating_add(1);
            }
        }

        Ok(true)
    }

    /// Live handle to the list for `event_name`, if one exists.
    #[must_use]
    pub fn listeners<Q>(&self, event_name: &Q) -> Option<ListenerList<K, A>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.borrow().get(event_name).cloned()
    }

    /// Number of entries registered for `event_name`.
    #[must_use]
    pub fn listener_count<Q>(&self, event_name: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.listeners(event_name).map_or(0, |list| list.len())
    }

    /// Events that currently have a list.
    #[must_use]
    pub fn event_names(&self) -> Vec<K> {
        self.events.borrow().keys().cloned().collect()
    }

    /// Snapshot of the events that have a list, each mapped to its live list.
    ///
    /// The set of keys is fixed when this is called; events registered later
    /// do not appear. The lists themselves are live and track later
    /// registrations and removals on those events.
    #[must_use]
    pub fn events(&self) -> HashMap<K, ListenerList<K, A>> {
        self.events.borrow().clone()
    }

    /// The event mapping cannot be replaced.
    ///
    /// # Errors
    ///
    /// Always returns [`ChannelError::ReadOnlyViolation`].
    #[allow(clippy::unused_self)]
    pub fn set_events(&self, _events: HashMap<K, ListenerList<K, A>>) -> ChannelResult<()> {
        Err(ChannelError::ReadOnlyViolation { property: "events" })
    }
}

impl<K, A> Default for EventChannel<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, A> fmt::Debug for EventChannel<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_count = self.events.try_borrow().map(|e| e.len()).unwrap_or_default();
        f.debug_struct("EventChannel")
            .field("max_listeners", &self.max_listeners.get())
            .field("event_count", &event_count)
            .finish()
    }
}
