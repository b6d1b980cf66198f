//! Event sources and subscriptions
//!
//! Frame and scroll callbacks are delivered through an [`EventSource`].
//! Registering a listener returns a [`Subscription`]; cancelling it (or
//! dropping it) removes the listener exactly once.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Identifier for a listener registered on an event source
    pub struct ListenerId;
}

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;
type ListenerMap<T> = RefCell<SlotMap<ListenerId, Listener<T>>>;

/// One animation frame, carrying the elapsed time since the previous frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Seconds since the previous frame
    pub dt: f64,
}

impl FrameTick {
    pub fn new(dt: f64) -> Self {
        Self { dt }
    }

    /// Tick for a fixed frame rate
    pub fn at_fps(fps: u32) -> Self {
        Self {
            dt: 1.0 / fps.max(1) as f64,
        }
    }
}

/// A single-threaded event source listeners can subscribe to
pub struct EventSource<T: 'static> {
    listeners: Rc<ListenerMap<T>>,
}

impl<T: 'static> EventSource<T> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register a listener. Keep the returned handle alive for as long as
    /// the listener should receive events.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        let id = self.listeners.borrow_mut().insert(listener);
        tracing::trace!(?id, "listener subscribed");

        let weak: Weak<ListenerMap<T>> = Rc::downgrade(&self.listeners);
        Subscription {
            id,
            cancel: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().remove(id);
                    tracing::trace!(?id, "listener cancelled");
                }
            })),
        }
    }

    /// Deliver an event to every live listener. Returns how many were invoked.
    ///
    /// Listeners may subscribe or cancel while the event is being delivered;
    /// a listener cancelled mid-dispatch is not invoked afterwards.
    pub fn emit(&self, event: &T) -> usize {
        let snapshot: SmallVec<[(ListenerId, Listener<T>); 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (id, listener.clone()))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains_key(id) {
                continue;
            }
            // A listener re-entering its own source would already hold this borrow
            let Ok(mut callback) = listener.try_borrow_mut() else {
                continue;
            };
            (&mut *callback)(event);
            delivered += 1;
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl<T: 'static> Default for EventSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation handle returned by [`EventSource::subscribe`]
///
/// The listener is removed when [`Subscription::cancel`] is called or the
/// handle is dropped, whichever happens first.
pub struct Subscription {
    id: ListenerId,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the cancellation has not run yet
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Remove the listener from its source
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
