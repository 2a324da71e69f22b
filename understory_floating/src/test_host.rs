// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host and context helpers shared by unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::context::FloatingContext;
use crate::host::{EventTarget, Host, ListenOptions, PointerEvents, StyleTarget};
use crate::input::EventKind;

pub(crate) type El = u32;

#[derive(Debug, Default)]
pub(crate) struct TestHost {
    parents: Vec<(El, El)>,
    rects: Vec<(El, Rect)>,
    ancestors: Vec<(El, Vec<EventTarget<El>>)>,
    next_listener: u32,
    listeners: Vec<(u32, EventTarget<El>, EventKind, ListenOptions)>,
    styles: Vec<(StyleTarget<El>, PointerEvents)>,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_parent(mut self, child: El, parent: El) -> Self {
        self.parents.push((child, parent));
        self
    }

    pub(crate) fn with_rect(mut self, el: El, rect: Rect) -> Self {
        self.rects.push((el, rect));
        self
    }

    pub(crate) fn with_ancestors(mut self, el: El, ancestors: Vec<EventTarget<El>>) -> Self {
        self.ancestors.push((el, ancestors));
        self
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.2 == kind).count()
    }

    pub(crate) fn is_listening(&self, target: EventTarget<El>, kind: EventKind) -> bool {
        self.listeners.iter().any(|l| l.1 == target && l.2 == kind)
    }

    pub(crate) fn options_of(&self, target: EventTarget<El>, kind: EventKind) -> Option<ListenOptions> {
        self.listeners
            .iter()
            .find(|l| l.1 == target && l.2 == kind)
            .map(|l| l.3)
    }
}

impl Host for TestHost {
    type Element = El;
    type Listener = u32;

    fn contains(&self, ancestor: El, node: El) -> bool {
        let mut current = Some(node);
        // Bounded walk; test fixtures are shallow.
        for _ in 0..64 {
            match current {
                Some(n) if n == ancestor => return true,
                Some(n) => current = self.parents.iter().find(|(c, _)| *c == n).map(|(_, p)| *p),
                None => return false,
            }
        }
        false
    }

    fn bounding_rect(&self, element: El) -> Option<Rect> {
        self.rects.iter().find(|(e, _)| *e == element).map(|(_, r)| *r)
    }

    fn overflow_ancestors(&self, element: El) -> Vec<EventTarget<El>> {
        self.ancestors
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, a)| a.clone())
            .unwrap_or_default()
    }

    fn listen(&mut self, target: EventTarget<El>, kind: EventKind, options: ListenOptions) -> u32 {
        self.next_listener += 1;
        self.listeners
            .push((self.next_listener, target, kind, options));
        self.next_listener
    }

    fn unlisten(&mut self, listener: u32) {
        self.listeners.retain(|l| l.0 != listener);
    }

    fn pointer_events(&self, target: StyleTarget<El>) -> PointerEvents {
        self.styles
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, v)| *v)
            .unwrap_or_default()
    }

    fn set_pointer_events(&mut self, target: StyleTarget<El>, value: PointerEvents) {
        self.styles.retain(|(t, _)| *t != target);
        if value != PointerEvents::Unset {
            self.styles.push((target, value));
        }
    }
}

/// A context whose open-change requests are recorded.
pub(crate) fn recording_context(open: bool) -> (FloatingContext<El>, Rc<RefCell<Vec<bool>>>) {
    let log: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    let mut ctx = FloatingContext::new(move |o| l.borrow_mut().push(o));
    ctx.open = open;
    (ctx, log)
}
