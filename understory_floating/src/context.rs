// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared context both controllers read: open flag, callback, refs, bus, tree id.
//!
//! A [`FloatingContext`] is owned by the host. It is created once per floating
//! element and updated by the host whenever the open state or element refs
//! change, after which the host calls each controller's `sync`. The
//! controllers never change `open` themselves. They request a change through
//! [`FloatingContext::request_open`], and the host decides.

use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Point;

use crate::events::EventBus;
use crate::input::{PointerEvent, PointerType};
use crate::tree::NodeId;

/// Callback invoked with the requested open state.
///
/// Must tolerate repeated calls with the same value.
pub type OpenChange = Rc<dyn Fn(bool)>;

/// Element handles for a floating element and its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Refs<E> {
    /// Positioning reference, when it is a real element.
    pub reference: Option<E>,
    /// The floating element.
    pub floating: Option<E>,
    /// Element that receives pointer events for the reference. Falls back to
    /// `reference` when unset.
    pub dom_reference: Option<E>,
}

impl<E> Default for Refs<E> {
    fn default() -> Self {
        Self {
            reference: None,
            floating: None,
            dom_reference: None,
        }
    }
}

impl<E: Copy> Refs<E> {
    /// Element that receives reference pointer events.
    pub fn event_reference(&self) -> Option<E> {
        self.dom_reference.or(self.reference)
    }
}

/// Side of the reference element the floating element is placed on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the reference.
    Top,
    /// Right of the reference.
    Right,
    /// Below the reference.
    #[default]
    Bottom,
    /// Left of the reference.
    Left,
}

/// Type of the input event that opened the floating element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpenEventKind {
    /// `click`
    Click,
    /// `mousedown`
    MouseDown,
    /// `pointerdown`
    PointerDown,
    /// `mouseenter`
    MouseEnter,
    /// `mousemove`
    MouseMove,
    /// `focus`
    Focus,
    /// Anything else (keyboard, programmatic).
    Other,
}

impl OpenEventKind {
    /// Opened by pressing, not hovering.
    pub fn is_click_like(self) -> bool {
        matches!(self, Self::Click | Self::MouseDown | Self::PointerDown)
    }

    /// Opened by hovering.
    pub fn is_hover(self) -> bool {
        matches!(self, Self::MouseEnter | Self::MouseMove)
    }
}

/// The input event that opened the floating element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpenEvent {
    /// Event type.
    pub kind: OpenEventKind,
    /// Device, if the event came from a pointer.
    pub pointer_type: Option<PointerType>,
    /// Pointer position, if any.
    pub position: Option<Point>,
    /// Timestamp in milliseconds.
    pub time: u64,
}

impl OpenEvent {
    /// Record a pointer event as an open event of `kind`.
    pub fn from_pointer<E>(kind: OpenEventKind, event: &PointerEvent<E>) -> Self {
        Self {
            kind,
            pointer_type: event.pointer_type,
            position: Some(event.position),
            time: event.time,
        }
    }
}

/// Mutable data shared between the host and every controller of a context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatingData {
    /// The event that most recently opened (or is about to open) the element.
    pub open_event: Option<OpenEvent>,
}

/// Shared state of a single floating element.
#[derive(Clone)]
pub struct FloatingContext<E> {
    /// Whether the floating element is currently open.
    pub open: bool,
    /// Open-state change request callback.
    pub on_open_change: OpenChange,
    /// Event bus shared by the controllers of this element.
    pub events: EventBus,
    /// Element handles.
    pub refs: Refs<E>,
    /// Id of this element in the floating tree, if registered.
    pub node_id: Option<NodeId>,
    /// Mutable data bag.
    pub data: Rc<RefCell<FloatingData>>,
    /// Side resolved by the positioning engine.
    pub placement: Side,
}

impl<E: core::fmt::Debug> core::fmt::Debug for FloatingContext<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FloatingContext")
            .field("open", &self.open)
            .field("refs", &self.refs)
            .field("node_id", &self.node_id)
            .field("placement", &self.placement)
            .field("data", &self.data.borrow())
            .finish_non_exhaustive()
    }
}

impl<E> FloatingContext<E> {
    /// Create a closed context with no refs and a fresh event bus.
    pub fn new(on_open_change: impl Fn(bool) + 'static) -> Self {
        Self {
            open: false,
            on_open_change: Rc::new(on_open_change),
            events: EventBus::new(),
            refs: Refs::default(),
            node_id: None,
            data: Rc::new(RefCell::new(FloatingData::default())),
            placement: Side::default(),
        }
    }

    /// Ask the host to open or close the floating element.
    pub fn request_open(&self, open: bool) {
        #[cfg(feature = "tracing")]
        tracing::debug!(open, node = ?self.node_id, "floating open change requested");
        (self.on_open_change)(open);
    }

    /// The event that opened the element, if recorded.
    pub fn open_event(&self) -> Option<OpenEvent> {
        self.data.borrow().open_event
    }

    /// Record the event that opens the element.
    pub fn set_open_event(&self, event: OpenEvent) {
        self.data.borrow_mut().open_event = Some(event);
    }

    /// True if the element was opened by a press rather than a hover.
    pub fn opened_by_click(&self) -> bool {
        self.open_event().is_some_and(|e| e.kind.is_click_like())
    }

    /// True if the element was opened by a hover.
    pub fn opened_by_hover(&self) -> bool {
        self.open_event().is_some_and(|e| e.kind.is_hover())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn request_open_calls_back() {
        let log: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let ctx: FloatingContext<u32> = FloatingContext::new(move |o| l.borrow_mut().push(o));
        ctx.request_open(true);
        ctx.request_open(false);
        ctx.request_open(false);
        assert_eq!(*log.borrow(), vec![true, false, false]);
    }

    #[test]
    fn open_event_is_shared_across_clones() {
        let ctx: FloatingContext<u32> = FloatingContext::new(|_| {});
        let other = ctx.clone();
        assert!(!ctx.opened_by_click());
        other.set_open_event(OpenEvent {
            kind: OpenEventKind::Click,
            pointer_type: None,
            position: None,
            time: 5,
        });
        assert!(ctx.opened_by_click());
        assert!(!ctx.opened_by_hover());
    }

    #[test]
    fn event_reference_falls_back_to_reference() {
        let mut refs: Refs<u32> = Refs::default();
        assert_eq!(refs.event_reference(), None);
        refs.reference = Some(1);
        assert_eq!(refs.event_reference(), Some(1));
        refs.dom_reference = Some(2);
        assert_eq!(refs.event_reference(), Some(2));
    }

    #[test]
    fn click_like_kinds() {
        assert!(OpenEventKind::Click.is_click_like());
        assert!(OpenEventKind::MouseDown.is_click_like());
        assert!(OpenEventKind::PointerDown.is_click_like());
        assert!(!OpenEventKind::MouseEnter.is_click_like());
        assert!(OpenEventKind::MouseMove.is_hover());
        assert!(!OpenEventKind::Focus.is_hover());
    }
}
