// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-context event bus.
//!
//! Controllers sharing a [`FloatingContext`](crate::context::FloatingContext)
//! coordinate through named topics. The dismissal controller emits
//! [`Topic::Dismiss`] when it closes the floating element; the hover
//! controller subscribes to cancel its pending timers. Hosts may emit on the
//! bus too.
//!
//! Delivery is synchronous, in subscription order. Handlers may subscribe or
//! unsubscribe while an emit is running; the change applies from the next emit.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_floating::events::{DismissPayload, EventBus, Topic};
//!
//! let bus = EventBus::new();
//! let seen = Rc::new(Cell::new(false));
//! let s = seen.clone();
//! let id = bus.on(Topic::Dismiss, move |p| s.set(p.prevent_scroll()));
//! bus.emit(Topic::Dismiss, DismissPayload::Detail { prevent_scroll: true });
//! assert!(seen.get());
//! assert!(bus.off(Topic::Dismiss, id));
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Named channel on an [`EventBus`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Topic {
    /// The floating element was dismissed.
    Dismiss,
}

/// Payload carried by a [`Topic::Dismiss`] emission.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DismissPayload {
    /// No payload was given.
    #[default]
    Absent,
    /// Explicitly no details.
    False,
    /// Dismissal details.
    Detail {
        /// Focus or selection changes caused by the dismissal must not scroll
        /// the page.
        prevent_scroll: bool,
    },
}

impl DismissPayload {
    /// Whether the dismissal asked to prevent scrolling.
    pub fn prevent_scroll(self) -> bool {
        matches!(
            self,
            Self::Detail {
                prevent_scroll: true
            }
        )
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Rc<dyn Fn(&DismissPayload)>;

struct Registry {
    next_id: u64,
    handlers: Vec<(Topic, HandlerId, Handler)>,
}

/// Shared pub/sub channel. Clones refer to the same bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("handlers", &registry.handlers.len())
            .finish_non_exhaustive()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Subscribe `handler` to `topic`.
    pub fn on(&self, topic: Topic, handler: impl Fn(&DismissPayload) + 'static) -> HandlerId {
        let mut registry = self.inner.borrow_mut();
        let id = HandlerId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.push((topic, id, Rc::new(handler)));
        id
    }

    /// Unsubscribe a handler. Returns `false` if it was not subscribed.
    pub fn off(&self, topic: Topic, id: HandlerId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.handlers.len();
        registry
            .handlers
            .retain(|(t, h, _)| !(*t == topic && *h == id));
        registry.handlers.len() != before
    }

    /// Deliver `payload` to every handler of `topic`.
    pub fn emit(&self, topic: Topic, payload: DismissPayload) {
        // Snapshot so handlers can re-enter `on`/`off`.
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .handlers
            .iter()
            .filter(|(t, _, _)| *t == topic)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(&payload);
        }
    }

    /// Number of handlers subscribed to `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .handlers
            .iter()
            .filter(|(t, _, _)| *t == topic)
            .count()
    }

    /// True if both handles refer to the same bus.
    pub fn same_bus(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
