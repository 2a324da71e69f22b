// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny in-memory page used by the demos.
//!
//! Elements are numbered boxes with a parent link. Listeners are printed as
//! they are attached and detached so the demos show the controllers' effects.

use kurbo::Rect;
use understory_floating::host::{EventTarget, Host, ListenOptions, PointerEvents, StyleTarget};
use understory_floating::input::EventKind;

/// One element of the page.
#[derive(Clone, Debug)]
pub struct Element {
    /// Display name.
    pub name: &'static str,
    /// Bounds in viewport coordinates.
    pub rect: Rect,
    /// Parent element.
    pub parent: Option<u32>,
    /// The element scrolls its content.
    pub scrolls: bool,
}

/// In-memory page.
#[derive(Debug, Default)]
pub struct Page {
    elements: Vec<Element>,
    listeners: Vec<(u32, EventTarget<u32>, EventKind)>,
    next_listener: u32,
    styles: Vec<(StyleTarget<u32>, PointerEvents)>,
}

impl Page {
    /// Add an element and return its handle.
    pub fn add(&mut self, name: &'static str, rect: Rect, parent: Option<u32>, scrolls: bool) -> u32 {
        self.elements.push(Element {
            name,
            rect,
            parent,
            scrolls,
        });
        u32::try_from(self.elements.len() - 1).unwrap_or(u32::MAX)
    }

    /// Topmost element under `point`, preferring later (nested) elements.
    pub fn hit(&self, point: kurbo::Point) -> Option<u32> {
        self.elements
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.rect.contains(point))
            .and_then(|(i, _)| u32::try_from(i).ok())
    }

    /// Name of an element.
    pub fn name(&self, element: u32) -> &'static str {
        self.get(element).map_or("?", |e| e.name)
    }

    /// Listeners currently attached.
    pub fn listeners(&self) -> impl Iterator<Item = (EventTarget<u32>, EventKind)> + '_ {
        self.listeners.iter().map(|l| (l.1, l.2))
    }

    fn get(&self, element: u32) -> Option<&Element> {
        self.elements.get(usize::try_from(element).ok()?)
    }
}

impl Host for Page {
    type Element = u32;
    type Listener = u32;

    fn contains(&self, ancestor: u32, node: u32) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.get(n).and_then(|e| e.parent);
        }
        false
    }

    fn bounding_rect(&self, element: u32) -> Option<Rect> {
        self.get(element).map(|e| e.rect)
    }

    fn overflow_ancestors(&self, element: u32) -> Vec<EventTarget<u32>> {
        let mut out = Vec::new();
        let mut current = self.get(element).and_then(|e| e.parent);
        while let Some(n) = current {
            let Some(e) = self.get(n) else { break };
            if e.scrolls {
                out.push(EventTarget::Element(n));
            }
            current = e.parent;
        }
        out.push(EventTarget::Window);
        out.push(EventTarget::VisualViewport);
        out
    }

    fn listen(&mut self, target: EventTarget<u32>, kind: EventKind, options: ListenOptions) -> u32 {
        self.next_listener += 1;
        println!("  + listen {kind:?} on {target:?} (passive: {})", options.passive);
        self.listeners.push((self.next_listener, target, kind));
        self.next_listener
    }

    fn unlisten(&mut self, listener: u32) {
        if let Some(i) = self.listeners.iter().position(|l| l.0 == listener) {
            let (_, target, kind) = self.listeners.remove(i);
            println!("  - unlisten {kind:?} on {target:?}");
        }
    }

    fn pointer_events(&self, target: StyleTarget<u32>) -> PointerEvents {
        self.styles
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, v)| *v)
            .unwrap_or_default()
    }

    fn set_pointer_events(&mut self, target: StyleTarget<u32>, value: PointerEvents) {
        println!("  ~ pointer-events {value:?} on {target:?}");
        self.styles.retain(|(t, _)| *t != target);
        if value != PointerEvents::Unset {
            self.styles.push((target, value));
        }
    }
}
