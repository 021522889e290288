//! Listener handles and the per-event listener lists they live in.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::channel::EventChannel;
use crate::error::ListenerResult;

/// Callback signature shared by every listener.
///
/// The first argument is the channel the event was emitted on, the second
/// the payload passed to [`EventChannel::emit`].
pub type ListenerFn<K, A> = dyn Fn(&EventChannel<K, A>, &A) -> ListenerResult;

/// A registered callback.
///
/// Clones share identity: [`EventChannel::off`] removes an entry only when
/// it was registered with a clone of the same handle. Two handles built from
/// identical closures are distinct listeners.
pub struct Listener<K, A> {
    callback: Rc<ListenerFn<K, A>>,
}

impl<K, A> Listener<K, A> {
    /// Create a listener from a fallible callback.
    ///
    /// Returning an error aborts the dispatch pass that invoked it.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EventChannel<K, A>, &A) -> ListenerResult + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Create a listener from a callback that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&EventChannel<K, A>, &A) + 'static,
    {
        Self::new(move |channel, args| {
            callback(channel, args);
            Ok(())
        })
    }

    /// Whether `self` and `other` are the same listener.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }

    pub(crate) fn call(&self, channel: &EventChannel<K, A>, args: &A) -> ListenerResult {
        (self.callback)(channel, args)
    }
}

impl<K: 'static, A: 'static> Listener<K, A> {
    /// Fresh handle that forwards to `self`.
    ///
    /// The wrapper has its own identity, so it never matches `self` on removal.
    pub(crate) fn forwarding(&self) -> Self {
        let inner = self.clone();
        Self::new(move |channel, args| inner.call(channel, args))
    }
}

impl<K, A> Clone for Listener<K, A> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<K, A> PartialEq for Listener<K, A> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<K, A> Eq for Listener<K, A> {}

impl<K, A> fmt::Debug for Listener<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// A listener as stored in a channel, with its once flag.
pub struct ListenerEntry<K, A> {
    listener: Listener<K, A>,
    once: bool,
}

impl<K, A> ListenerEntry<K, A> {
    pub(crate) fn new(listener: Listener<K, A>, once: bool) -> Self {
        Self { listener, once }
    }

    /// The registered listener handle.
    ///
    /// For entries added with [`EventChannel::once`] this is the internal
    /// wrapper, not the handle passed by the caller.
    #[must_use]
    pub fn listener(&self) -> &Listener<K, A> {
        &self.listener
    }

    /// Whether the entry is removed after its next invocation.
    #[must_use]
    pub fn is_once(&self) -> bool {
        self.once
    }
}

impl<K, A> Clone for ListenerEntry<K, A> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            once: self.once,
        }
    }
}

impl<K, A> fmt::Debug for ListenerEntry<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("listener", &self.listener)
            .field("once", &self.once)
            .finish()
    }
}

/// Live handle to the ordered listeners of one event.
///
/// Handles obtained from [`EventChannel::listeners`] or
/// [`EventChannel::events`] observe every later registration and removal.
/// After [`EventChannel::all_off`] the handle is detached: it keeps its
/// entries but the channel no longer reaches it.
pub struct ListenerList<K, A> {
    entries: Rc<RefCell<Vec<ListenerEntry<K, A>>>>,
}

impl<K, A> ListenerList<K, A> {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ListenerEntry<K, A>> {
        self.entries.borrow().get(index).cloned()
    }

    /// Snapshot of all entries in registration order.
    #[must_use]
    pub fn entries(&self) -> Vec<ListenerEntry<K, A>> {
        self.entries.borrow().clone()
    }

    /// Snapshot of the registered listener handles in registration order.
    #[must_use]
    pub fn listeners(&self) -> Vec<Listener<K, A>> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.listener.clone())
            .collect()
    }

    /// Whether `listener` is registered in this list.
    #[must_use]
    pub fn contains(&self, listener: &Listener<K, A>) -> bool {
        self.position(listener).is_some()
    }

    /// Index of the first entry registered with `listener`.
    #[must_use]
    pub fn position(&self, listener: &Listener<K, A>) -> Option<usize> {
        self.entries
            .borrow()
            .iter()
            .position(|entry| entry.listener.same_as(listener))
    }

    /// Whether `self` and `other` are handles to the same list.
    #[must_use]
    pub fn same_list(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn push(&self, entry: ListenerEntry<K, A>) {
        self.entries.borrow_mut().push(entry);
    }

    /// Remove whatever entry currently sits at `index`.
    pub(crate) fn remove_at(&self, index: usize) -> Option<ListenerEntry<K, A>> {
        let mut entries = self.entries.borrow_mut();
        (index < entries.len()).then(|| entries.remove(index))
    }

    /// Remove the last entry registered with `listener`.
    pub(crate) fn remove_last(&self, listener: &Listener<K, A>) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries
            .iter()
            .rposition(|entry| entry.listener.same_as(listener))
        {
            Some(index) => {
                entries.remove(index);
                true
            },
            None => false,
        }
    }
}

impl<K, A> Default for ListenerList<K, A> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<K, A> Clone for ListenerList<K, A> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<K, A> fmt::Debug for ListenerList<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.entries.try_borrow().map(|e| e.len()).unwrap_or_default();
        f.debug_struct("ListenerList").field("len", &len).finish()
    }
}
