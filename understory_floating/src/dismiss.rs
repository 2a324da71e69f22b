// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dismissal controller: close on Escape, outside press, or ancestor scroll.
//!
//! ## Usage
//!
//! 1) Merge [`Dismiss::props`] into the element handler sets and route
//!    reference `pointerdown` to [`Dismiss::on_reference_pointer_down`].
//! 2) After every change to the context (open flag, refs), call
//!    [`Dismiss::sync`]. While the element is open, it attaches document
//!    `keydown`/`pointerdown` and ancestor `scroll` listeners through the host.
//!    When the element closes, it detaches them.
//! 3) Route events from those listeners to [`Dismiss::on_key_down`],
//!    [`Dismiss::on_document_pointer_down`] and [`Dismiss::on_ancestor_scroll`].
//! 4) Call [`Dismiss::teardown`] when the floating element unmounts.
//!
//! ## Nested elements
//!
//! With `bubbles` off, a floating element that has any descendant in the tree
//! ignores Escape and outside presses, leaving them to the innermost element.
//! Presses inside a descendant's floating content never count as outside.

use alloc::vec::Vec;

use crate::context::FloatingContext;
use crate::effect::Effect;
use crate::events::{DismissPayload, Topic};
use crate::host::{EventTarget, Host, ListenOptions, is_within};
use crate::input::{ElementProps, EventKind, EventKinds, Key, KeyEvent, PointerEvent};
use crate::tree::FloatingTree;

/// Dismissal options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DismissOptions {
    /// Master switch. When off, no handlers and no listeners.
    pub enabled: bool,
    /// Close on Escape.
    pub escape_key: bool,
    /// Close on a press outside the reference and floating elements.
    pub outside_pointer_down: bool,
    /// Close on a press on the reference element itself.
    pub reference_pointer_down: bool,
    /// Close when any scrollable ancestor scrolls.
    pub ancestor_scroll: bool,
    /// Dismiss even while nested floating elements exist below this one.
    pub bubbles: bool,
}

impl Default for DismissOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            escape_key: true,
            outside_pointer_down: true,
            reference_pointer_down: false,
            ancestor_scroll: false,
            bubbles: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct DocumentKey<E> {
    escape_key: bool,
    outside_pointer_down: bool,
    ancestor_scroll: bool,
    reference: Option<E>,
    floating: Option<E>,
}

/// Dismissal controller for one floating element.
#[derive(Clone, Debug)]
pub struct Dismiss<E, L> {
    options: DismissOptions,
    document: Effect<DocumentKey<E>, L>,
    scroll_targets: Vec<EventTarget<E>>,
}

impl<E: Copy + Eq, L: Copy> Dismiss<E, L> {
    /// Create a controller. Nothing is attached until [`Dismiss::sync`].
    pub fn new(options: DismissOptions) -> Self {
        Self {
            options,
            document: Effect::new(),
            scroll_targets: Vec::new(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &DismissOptions {
        &self.options
    }

    /// Replace the options. Takes effect at the next [`Dismiss::sync`].
    pub fn set_options(&mut self, options: DismissOptions) {
        self.options = options;
    }

    /// Element handlers to install. Empty when disabled.
    pub fn props(&self) -> ElementProps {
        if !self.options.enabled {
            return ElementProps::EMPTY;
        }
        ElementProps {
            reference: EventKinds::POINTER_DOWN,
            floating: EventKinds::empty(),
        }
    }

    /// Scroll targets currently listened to.
    pub fn scroll_targets(&self) -> &[EventTarget<E>] {
        &self.scroll_targets
    }

    /// Number of listeners this controller holds on the host.
    pub fn attached_listeners(&self) -> usize {
        self.document.listeners().len()
    }

    /// Reconcile document and ancestor listeners with the context.
    pub fn sync<H>(&mut self, ctx: &FloatingContext<E>, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        let o = self.options;
        let key = (ctx.open && o.enabled).then_some(DocumentKey {
            escape_key: o.escape_key,
            outside_pointer_down: o.outside_pointer_down,
            ancestor_scroll: o.ancestor_scroll,
            reference: ctx.refs.event_reference(),
            floating: ctx.refs.floating,
        });
        let mut targets = Vec::new();
        let changed = self.document.sync(host, key, |host, key| {
            let mut listeners = Vec::new();
            if key.escape_key {
                listeners.push(host.listen(
                    EventTarget::Document,
                    EventKind::KeyDown,
                    ListenOptions::default(),
                ));
            }
            if key.outside_pointer_down {
                listeners.push(host.listen(
                    EventTarget::Document,
                    EventKind::PointerDown,
                    ListenOptions::default(),
                ));
            }
            if key.ancestor_scroll {
                targets = scroll_ancestors(&*host, key.reference, key.floating);
                for &target in &targets {
                    listeners.push(host.listen(
                        target,
                        EventKind::Scroll,
                        ListenOptions { passive: true },
                    ));
                }
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(count = listeners.len(), "dismiss listeners attached");
            listeners
        });
        if changed {
            self.scroll_targets = targets;
        }
    }

    /// Detach every listener.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        self.document.teardown(host);
        self.scroll_targets.clear();
    }

    /// Document `keydown`. Returns `true` if the element was dismissed.
    pub fn on_key_down(
        &self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        event: &KeyEvent,
    ) -> bool {
        if !self.document.key().is_some_and(|k| k.escape_key) || event.key != Key::Escape {
            return false;
        }
        if self.defers_to_descendants(ctx, tree) {
            return false;
        }
        ctx.events.emit(
            Topic::Dismiss,
            DismissPayload::Detail {
                prevent_scroll: false,
            },
        );
        ctx.request_open(false);
        true
    }

    /// Document `pointerdown`. Returns `true` if the element was dismissed.
    pub fn on_document_pointer_down<H>(
        &self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        host: &H,
        event: &PointerEvent<E>,
    ) -> bool
    where
        H: Host<Element = E, Listener = L>,
    {
        if !self
            .document
            .key()
            .is_some_and(|k| k.outside_pointer_down)
        {
            return false;
        }
        let target = event.target;
        let inside_children = match (tree, ctx.node_id) {
            (Some(tree), Some(id)) => tree.children(id).iter().any(|node| {
                let floating = node.context.as_ref().and_then(|c| c.refs.floating);
                is_within(host, target, floating)
            }),
            _ => false,
        };
        if is_within(host, target, ctx.refs.floating)
            || is_within(host, target, ctx.refs.event_reference())
            || inside_children
        {
            return false;
        }
        if self.defers_to_descendants(ctx, tree) {
            return false;
        }
        let nested = match (tree, ctx.node_id) {
            (Some(tree), Some(id)) => tree.is_nested(id),
            _ => false,
        };
        let payload = if nested {
            DismissPayload::Detail {
                prevent_scroll: true,
            }
        } else {
            DismissPayload::False
        };
        ctx.events.emit(Topic::Dismiss, payload);
        ctx.request_open(false);
        true
    }

    /// `scroll` on an ancestor. Returns `true` if the element was dismissed.
    pub fn on_ancestor_scroll(&self, ctx: &FloatingContext<E>, target: EventTarget<E>) -> bool {
        if !self.scroll_targets.contains(&target) {
            return false;
        }
        ctx.request_open(false);
        true
    }

    /// Reference `pointerdown`. Returns `true` if the element was dismissed.
    pub fn on_reference_pointer_down(&self, ctx: &FloatingContext<E>) -> bool {
        if !self.options.enabled || !self.options.reference_pointer_down {
            return false;
        }
        ctx.events.emit(Topic::Dismiss, DismissPayload::Absent);
        ctx.request_open(false);
        true
    }

    // Only existence of a descendant is checked, not whether it is open.
    fn defers_to_descendants(
        &self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
    ) -> bool {
        if self.options.bubbles {
            return false;
        }
        match (tree, ctx.node_id) {
            (Some(tree), Some(id)) => tree.has_descendants(id),
            _ => false,
        }
    }
}

/// Overflow ancestors of both elements, without the visual viewport.
fn scroll_ancestors<H: Host>(
    host: &H,
    reference: Option<H::Element>,
    floating: Option<H::Element>,
) -> Vec<EventTarget<H::Element>> {
    let mut out: Vec<EventTarget<H::Element>> = Vec::new();
    for element in [reference, floating].into_iter().flatten() {
        for ancestor in host.overflow_ancestors(element) {
            if ancestor != EventTarget::VisualViewport && !out.contains(&ancestor) {
                out.push(ancestor);
            }
        }
    }
    out
}
