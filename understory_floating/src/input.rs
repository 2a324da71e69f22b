// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events fed to the controllers, and the element handler sets they request.
//!
//! ## Element handlers
//!
//! Each controller reports, through [`ElementProps`], which events the host
//! should route to it for the reference and floating elements. Merge the
//! props of every controller attached to the same pair with
//! [`ElementProps::merge`] and subscribe the real elements to the union.

use kurbo::Point;

/// Kind of pointing device that produced an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// Mouse or trackpad.
    Mouse,
    /// Stylus.
    Pen,
    /// Finger on a touch surface.
    Touch,
}

/// A pointer or mouse event.
///
/// The same shape serves `pointerdown`, `pointerenter`, `pointermove`,
/// `mouseenter`, `mousemove` and `mouseleave`; the controller method that
/// receives it determines the type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent<E> {
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// Device that produced the event, if known.
    pub pointer_type: Option<PointerType>,
    /// Innermost element under the pointer.
    pub target: Option<E>,
    /// For enter/leave events, the element the pointer came from or went to.
    pub related_target: Option<E>,
    /// Timestamp in milliseconds.
    pub time: u64,
}

impl<E> PointerEvent<E> {
    /// A mouse event at `position` with no target.
    pub fn mouse(position: Point, time: u64) -> Self {
        Self {
            position,
            pointer_type: Some(PointerType::Mouse),
            target: None,
            related_target: None,
            time,
        }
    }

    /// Set the event target.
    pub fn with_target(mut self, target: E) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the related target.
    pub fn with_related_target(mut self, related: E) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Set the pointer type.
    pub fn with_pointer_type(mut self, pointer_type: Option<PointerType>) -> Self {
        self.pointer_type = pointer_type;
        self
    }
}

/// Logical key of a keyboard event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The Escape key.
    Escape,
    /// Any other key.
    Other,
}

/// A `keydown` event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that went down.
    pub key: Key,
    /// Timestamp in milliseconds.
    pub time: u64,
}

/// A single event type a controller can listen for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `pointerdown`
    PointerDown,
    /// `pointerenter`
    PointerEnter,
    /// `pointermove`
    PointerMove,
    /// `mouseenter`
    MouseEnter,
    /// `mousemove`
    MouseMove,
    /// `mouseleave`
    MouseLeave,
    /// `keydown`
    KeyDown,
    /// `scroll`
    Scroll,
}

bitflags::bitflags! {
    /// A set of [`EventKind`]s.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventKinds: u16 {
        /// `pointerdown`
        const POINTER_DOWN  = 1 << 0;
        /// `pointerenter`
        const POINTER_ENTER = 1 << 1;
        /// `pointermove`
        const POINTER_MOVE  = 1 << 2;
        /// `mouseenter`
        const MOUSE_ENTER   = 1 << 3;
        /// `mousemove`
        const MOUSE_MOVE    = 1 << 4;
        /// `mouseleave`
        const MOUSE_LEAVE   = 1 << 5;
        /// `keydown`
        const KEY_DOWN      = 1 << 6;
        /// `scroll`
        const SCROLL        = 1 << 7;
    }
}

impl From<EventKind> for EventKinds {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::PointerDown => Self::POINTER_DOWN,
            EventKind::PointerEnter => Self::POINTER_ENTER,
            EventKind::PointerMove => Self::POINTER_MOVE,
            EventKind::MouseEnter => Self::MOUSE_ENTER,
            EventKind::MouseMove => Self::MOUSE_MOVE,
            EventKind::MouseLeave => Self::MOUSE_LEAVE,
            EventKind::KeyDown => Self::KEY_DOWN,
            EventKind::Scroll => Self::SCROLL,
        }
    }
}

/// Events a controller wants routed to it, per element role.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementProps {
    /// Events on the reference element.
    pub reference: EventKinds,
    /// Events on the floating element.
    pub floating: EventKinds,
}

impl ElementProps {
    /// No handlers for either element.
    pub const EMPTY: Self = Self {
        reference: EventKinds::empty(),
        floating: EventKinds::empty(),
    };

    /// Union of two handler sets.
    pub fn merge(self, other: Self) -> Self {
        Self {
            reference: self.reference | other.reference,
            floating: self.floating | other.floating,
        }
    }

    /// True if neither element needs any handler.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty() && self.floating.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_union_per_role() {
        let a = ElementProps {
            reference: EventKinds::POINTER_DOWN,
            floating: EventKinds::empty(),
        };
        let b = ElementProps {
            reference: EventKinds::MOUSE_ENTER | EventKinds::POINTER_DOWN,
            floating: EventKinds::MOUSE_LEAVE,
        };
        let m = a.merge(b);
        assert_eq!(
            m.reference,
            EventKinds::POINTER_DOWN | EventKinds::MOUSE_ENTER
        );
        assert_eq!(m.floating, EventKinds::MOUSE_LEAVE);
        assert!(ElementProps::EMPTY.is_empty());
        assert!(!m.is_empty());
    }

    #[test]
    fn kind_maps_to_single_flag() {
        for kind in [
            EventKind::PointerDown,
            EventKind::PointerEnter,
            EventKind::PointerMove,
            EventKind::MouseEnter,
            EventKind::MouseMove,
            EventKind::MouseLeave,
            EventKind::KeyDown,
            EventKind::Scroll,
        ] {
            assert_eq!(EventKinds::from(kind).bits().count_ones(), 1);
        }
    }
}
