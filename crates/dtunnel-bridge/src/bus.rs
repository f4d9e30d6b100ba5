// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-channel publish/subscribe.
//
// Single-threaded and synchronous: `emit` runs every listener before it
// returns. Listeners are snapshotted per emission, so subscribing or
// unsubscribing mid-dispatch only affects later emissions. A panicking
// listener is logged and skipped; the remaining listeners still run.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::error;

/// Handle identifying one registration.
pub type ListenerId = u64;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Registry<T: ?Sized> {
    next_id: ListenerId,
    /// Registration order is delivery order.
    channels: HashMap<String, Vec<(ListenerId, Listener<T>)>>,
}

impl<T: ?Sized> Registry<T> {
    fn remove(&mut self, channel: &str, id: ListenerId) -> bool {
        let Some(listeners) = self.channels.get_mut(channel) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.channels.remove(channel);
        }
        removed
    }
}

/// Shared event bus. Clones are cheap and share one registry.
pub struct EventBus<T: ?Sized + 'static> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T: ?Sized + 'static> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> EventBus<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 1,
                channels: HashMap::new(),
            })),
        }
    }

    /// Subscribe `listener` to `channel`.
    pub fn on(&self, channel: &str, listener: impl Fn(&T) + 'static) -> Subscription<T> {
        self.insert(channel, Rc::new(listener))
    }

    /// Subscribe for a single delivery.
    ///
    /// The registration is removed before `listener` runs, so a listener
    /// that re-subscribes from inside its own invocation keeps the new
    /// subscription.
    pub fn once(&self, channel: &str, listener: impl FnOnce(&T) + 'static) -> Subscription<T> {
        let slot = RefCell::new(Some(listener));
        let fired = Cell::new(false);
        let registry = Rc::downgrade(&self.inner);
        let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let own_channel = channel.to_owned();

        let wrapper_id = Rc::clone(&own_id);
        let subscription = self.insert(
            channel,
            Rc::new(move |payload: &T| {
                if fired.replace(true) {
                    return;
                }
                if let (Some(inner), Some(id)) = (registry.upgrade(), wrapper_id.get()) {
                    inner.borrow_mut().remove(&own_channel, id);
                }
                let listener = slot.borrow_mut().take();
                if let Some(listener) = listener {
                    listener(payload);
                }
            }),
        );
        own_id.set(Some(subscription.id));
        subscription
    }

    /// Remove one registration. Returns whether it existed.
    pub fn off(&self, channel: &str, id: ListenerId) -> bool {
        self.inner.borrow_mut().remove(channel, id)
    }

    /// Drop every listener on `channel`, or on every channel for `None`.
    pub fn clear(&self, channel: Option<&str>) {
        let mut registry = self.inner.borrow_mut();
        match channel {
            Some(channel) => {
                registry.channels.remove(channel);
            }
            None => registry.channels.clear(),
        }
    }

    /// Deliver `payload` to every listener on `channel`, in order.
    pub fn emit(&self, channel: &str, payload: &T) {
        let snapshot: Vec<Listener<T>> = match self.inner.borrow().channels.get(channel) {
            Some(listeners) => listeners.iter().map(|(_, l)| Rc::clone(l)).collect(),
            None => return,
        };

        for listener in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(payload)));
            if let Err(panic) = outcome {
                error!(channel, reason = %panic_message(&*panic), "listener error");
            }
        }
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.inner
            .borrow()
            .channels
            .get(channel)
            .map_or(0, Vec::len)
    }

    /// Channels that currently have at least one listener, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.inner.borrow().channels.keys().cloned().collect();
        channels.sort();
        channels
    }

    fn insert(&self, channel: &str, listener: Listener<T>) -> Subscription<T> {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .channels
            .entry(channel.to_owned())
            .or_default()
            .push((id, listener));
        Subscription {
            registry: Rc::downgrade(&self.inner),
            channel: channel.to_owned(),
            id,
        }
    }
}

/// Unsubscribe handle returned by [`EventBus::on`] and [`EventBus::once`].
///
/// Dropping the handle keeps the listener registered.
pub struct Subscription<T: ?Sized + 'static> {
    registry: Weak<RefCell<Registry<T>>>,
    channel: String,
    id: ListenerId,
}

impl<T: ?Sized + 'static> Subscription<T> {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Remove the listener. Returns whether it was still registered.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(inner) => inner.borrow_mut().remove(&self.channel, self.id),
            None => false,
        }
    }
}

impl<T: ?Sized + 'static> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "listener panicked".to_owned()
    }
}
