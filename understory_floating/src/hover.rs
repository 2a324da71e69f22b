// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover-intent controller: open on hover, close on leave, with delays.
//!
//! ## Usage
//!
//! 1) Merge [`Hover::props`] into the element handler sets and route those
//!    events to the `on_reference_*` / `on_floating_*` methods.
//! 2) After every change to the context, call [`Hover::sync`].
//! 3) Route document `pointermove` and document-element `mouseleave` (attached
//!    through the host while needed) to [`Hover::on_document_pointer_move`]
//!    and [`Hover::on_document_mouse_leave`].
//! 4) Call [`Hover::poll`] at or after [`Hover::next_deadline`].
//! 5) Call [`Hover::teardown`] on unmount.
//!
//! ## Opening
//!
//! `mouseenter` on the reference opens the element, right away or after the
//! open delay. So does the first `mousemove` on the reference, which covers a
//! pointer that arrives without an enter (for example from a disabled
//! sibling). A non-zero `rest_ms` instead opens once the pointer has stayed
//! still over the reference for that long. Rest mode and delay mode exclude
//! each other: rest applies only when the open delay is zero.
//!
//! ## Closing
//!
//! `mouseleave` on the reference either starts a [`CloseIntent`] tracking
//! session or closes (right away or after the close delay). Elements opened by
//! a press are never closed by leaving. Closing is only ever requested: the
//! host decides and then calls [`Hover::sync`].
//!
//! ## Dismissal
//!
//! A [`Topic::Dismiss`] emission on the context's bus cancels every pending
//! timer. It also blocks the rest timer until the next enter, so an Escape is
//! not undone by a pointer that happens to rest over the reference.
//!
//! ## Pointer-events blocking
//!
//! While open with a close intent that asks for it, the body gets
//! `pointer-events: none` and the reference, the floating element and its tree
//! parent's floating element get `auto`. All pointer traffic then lands on the
//! pair being tracked. Previous values are restored on close, and only by the
//! instance that changed them.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::context::{FloatingContext, OpenEvent, OpenEventKind};
use crate::delay::{Delay, DelayKind, get_delay};
use crate::effect::Effect;
use crate::events::{EventBus, HandlerId, Topic};
use crate::host::{EventTarget, Host, ListenOptions, PointerEvents, StyleTarget, is_within};
use crate::input::{ElementProps, EventKind, EventKinds, PointerEvent, PointerType};
use crate::intent::{
    CloseIntent, Intent, IntentTracker, PointerSample, TrackContext, TrackStart,
};
use crate::timer::{TimerSlot, earliest};
use crate::tree::FloatingTree;

/// Hover options.
#[derive(Debug)]
pub struct HoverOptions {
    /// Master switch. When off, no handlers, listeners or timers.
    pub enabled: bool,
    /// Close-intent strategy consulted when the pointer leaves.
    pub handle_close: Option<Box<dyn CloseIntent>>,
    /// Open after the pointer rests this long over the reference. Zero disables.
    pub rest_ms: u64,
    /// Open/close delay.
    pub delay: Delay,
    /// Ignore touch and pen.
    pub mouse_only: bool,
    /// Treat the first reference `mousemove` as an enter.
    pub move_to_open: bool,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            handle_close: None,
            rest_ms: 0,
            delay: Delay::default(),
            mouse_only: false,
            move_to_open: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pending {
    Open,
    Close,
}

/// Pointer-events overrides applied by one instance.
#[derive(Clone, Debug)]
struct Blocking<E> {
    key: (Option<E>, Option<E>, Option<E>),
    saved: Vec<(StyleTarget<E>, PointerEvents)>,
}

/// Hover-intent controller for one floating element.
#[derive(Debug)]
pub struct Hover<E, L> {
    options: HoverOptions,
    pointer_type: Option<PointerType>,
    timeout: TimerSlot<Pending>,
    rest: TimerSlot<OpenEvent>,
    intent_timer: TimerSlot<()>,
    tracker: Option<Box<dyn IntentTracker>>,
    pointer_move: Option<L>,
    window_leave: Effect<(), L>,
    dismiss_handler: Option<(EventBus, HandlerId)>,
    dismissed: Rc<Cell<bool>>,
    block_mouse_move: bool,
    move_armed: bool,
    previous_open: Option<bool>,
    // Present only while this instance owns the pointer-events override.
    blocking: Option<Blocking<E>>,
}

impl<E: Copy + Eq, L: Copy> Hover<E, L> {
    /// Create a controller. Nothing is attached until [`Hover::sync`].
    pub fn new(options: HoverOptions) -> Self {
        Self {
            options,
            pointer_type: None,
            timeout: TimerSlot::new(),
            rest: TimerSlot::new(),
            intent_timer: TimerSlot::new(),
            tracker: None,
            pointer_move: None,
            window_leave: Effect::new(),
            dismiss_handler: None,
            dismissed: Rc::new(Cell::new(false)),
            block_mouse_move: true,
            move_armed: true,
            previous_open: None,
            blocking: None,
        }
    }

    /// Current options.
    pub fn options(&self) -> &HoverOptions {
        &self.options
    }

    /// Replace the options. Takes effect at the next [`Hover::sync`].
    pub fn set_options(&mut self, options: HoverOptions) {
        self.options = options;
    }

    /// Element handlers to install. Empty when disabled.
    pub fn props(&self) -> ElementProps {
        if !self.options.enabled {
            return ElementProps::EMPTY;
        }
        ElementProps {
            reference: EventKinds::POINTER_DOWN
                | EventKinds::POINTER_ENTER
                | EventKinds::MOUSE_ENTER
                | EventKinds::MOUSE_MOVE
                | EventKinds::MOUSE_LEAVE,
            floating: EventKinds::MOUSE_ENTER | EventKinds::MOUSE_LEAVE,
        }
    }

    /// Last pointer type seen on the reference.
    pub fn pointer_type(&self) -> Option<PointerType> {
        self.pointer_type
    }

    /// True while a close-intent session is tracking the pointer.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_some()
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        // A recorded dismissal cancels every timer at the next drain.
        if self.dismissed.get() {
            return None;
        }
        earliest([
            self.timeout.deadline(),
            self.rest.deadline(),
            self.intent_timer.deadline(),
        ])
    }

    /// Reconcile subscriptions, listeners and style overrides with the context.
    pub fn sync<H>(&mut self, ctx: &FloatingContext<E>, tree: Option<&FloatingTree<E>>, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        self.drain_dismiss();
        if !self.options.enabled {
            self.release(host);
            self.previous_open = Some(ctx.open);
            return;
        }

        self.subscribe_dismiss(&ctx.events);

        let window_key = self.options.handle_close.is_some().then_some(());
        self.window_leave.sync(host, window_key, |host, _| {
            alloc::vec![host.listen(
                EventTarget::DocumentElement,
                EventKind::MouseLeave,
                ListenOptions::default(),
            )]
        });

        if self.previous_open != Some(ctx.open) {
            self.move_armed = true;
        }
        if self.previous_open == Some(true) && !ctx.open {
            self.pointer_type = None;
            self.cleanup_pointer_move(host);
            self.restore_pointer_events(host);
        }

        let blocks = self
            .options
            .handle_close
            .as_ref()
            .is_some_and(|h| h.blocks_pointer_events());
        if ctx.open && blocks {
            self.block_pointer_events(ctx, tree, host);
        } else {
            self.restore_pointer_events(host);
        }

        self.previous_open = Some(ctx.open);
    }

    /// Release everything: timers, listeners, subscription, style overrides.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        self.release(host);
    }

    /// Reference `pointerdown` or `pointerenter`: record the pointer type.
    pub fn on_reference_pointer(&mut self, event: &PointerEvent<E>) {
        if self.options.enabled {
            self.pointer_type = event.pointer_type;
        }
    }

    /// Reference `mouseenter`. Returns `true` if an open was requested or scheduled.
    pub fn on_reference_mouse_enter(
        &mut self,
        ctx: &FloatingContext<E>,
        event: &PointerEvent<E>,
    ) -> bool {
        self.drain_dismiss();
        if !self.options.enabled {
            return false;
        }
        self.enter(ctx, event, OpenEventKind::MouseEnter)
    }

    /// Reference `mousemove`.
    ///
    /// The first move after each open-state change acts as an enter. Every
    /// move restarts the rest timer while closed.
    pub fn on_reference_mouse_move(&mut self, ctx: &FloatingContext<E>, event: &PointerEvent<E>) {
        self.drain_dismiss();
        if !self.options.enabled {
            return;
        }
        if self.move_armed && self.options.move_to_open {
            self.move_armed = false;
            self.enter(ctx, event, OpenEventKind::MouseMove);
        }
        let o = &self.options;
        if ctx.open || o.rest_ms == 0 || get_delay(o.delay, DelayKind::Open, None) != 0 {
            return;
        }
        self.rest.schedule(
            event.time,
            o.rest_ms,
            OpenEvent::from_pointer(OpenEventKind::MouseMove, event),
        );
    }

    /// Reference `mouseleave`.
    pub fn on_reference_mouse_leave<H>(
        &mut self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        host: &mut H,
        event: &PointerEvent<E>,
    ) where
        H: Host<Element = E, Listener = L>,
    {
        self.drain_dismiss();
        if !self.options.enabled {
            return;
        }
        if ctx.open && self.evaluate_leave(ctx, tree, host, event) {
            return;
        }
        if ctx.opened_by_click() {
            return;
        }
        self.rest.cancel();
        if !ctx.open {
            // Abort a pending open; there is nothing to track yet.
            self.timeout.cancel();
            return;
        }
        let Some(intent) = self.options.handle_close.as_ref() else {
            self.close_with_delay(ctx, event.time);
            return;
        };
        // The live tracker supersedes a `CloseAfter` from the leave evaluation.
        self.timeout.cancel();
        let tracker = intent.track(TrackStart {
            origin: event.position,
            leave: false,
        });
        self.cleanup_pointer_move(host);
        self.pointer_move = Some(host.listen(
            EventTarget::Document,
            EventKind::PointerMove,
            ListenOptions::default(),
        ));
        self.tracker = Some(tracker);
        #[cfg(feature = "tracing")]
        tracing::debug!("hover close intent tracking started");
    }

    /// Floating `mouseenter`: cancel a pending close.
    pub fn on_floating_mouse_enter(&mut self) {
        self.drain_dismiss();
        if self.options.enabled {
            self.timeout.cancel();
        }
    }

    /// Floating `mouseleave`.
    pub fn on_floating_mouse_leave<H>(
        &mut self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        host: &mut H,
        event: &PointerEvent<E>,
    ) where
        H: Host<Element = E, Listener = L>,
    {
        self.drain_dismiss();
        if !self.options.enabled || !ctx.open {
            return;
        }
        self.evaluate_leave(ctx, tree, host, event);
        if self.options.handle_close.is_none() && !ctx.opened_by_click() {
            self.close_with_delay(ctx, event.time);
        }
    }

    /// Document `pointermove` while a tracking session is active.
    pub fn on_document_pointer_move<H>(
        &mut self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        host: &mut H,
        event: &PointerEvent<E>,
    ) where
        H: Host<Element = E, Listener = L>,
    {
        self.drain_dismiss();
        if self.tracker.is_none() {
            return;
        }
        self.intent_timer.cancel();
        let cx = track_context(ctx, tree, &*host);
        let sample = pointer_sample(ctx, &*host, event, false);
        let verdict = match self.tracker.as_mut() {
            Some(tracker) => tracker.pointer_move(&cx, &sample),
            None => return,
        };
        self.apply_intent(ctx, host, verdict, event.time);
    }

    /// Document-element `mouseleave`: the pointer left the window.
    pub fn on_document_mouse_leave(&mut self, ctx: &FloatingContext<E>) {
        self.drain_dismiss();
        if self.options.enabled && self.window_leave.is_active() && ctx.opened_by_hover() {
            ctx.request_open(false);
        }
    }

    /// Fire timers due at `now`.
    pub fn poll<H>(&mut self, ctx: &FloatingContext<E>, host: &mut H, now: u64)
    where
        H: Host<Element = E, Listener = L>,
    {
        self.drain_dismiss();
        match self.timeout.take_due(now) {
            Some(Pending::Open) => ctx.request_open(true),
            Some(Pending::Close) => ctx.request_open(false),
            None => {}
        }
        if let Some(open_event) = self.rest.take_due(now) {
            if !self.block_mouse_move && !ctx.open {
                ctx.set_open_event(open_event);
                ctx.request_open(true);
            }
        }
        if self.intent_timer.take_due(now).is_some() {
            self.cleanup_pointer_move(host);
            self.close_with_delay(ctx, now);
        }
    }

    fn enter(
        &mut self,
        ctx: &FloatingContext<E>,
        event: &PointerEvent<E>,
        kind: OpenEventKind,
    ) -> bool {
        self.timeout.cancel();
        self.block_mouse_move = false;
        let o = &self.options;
        if ctx.open
            || (o.mouse_only && self.pointer_type != Some(PointerType::Mouse))
            || (o.rest_ms > 0 && get_delay(o.delay, DelayKind::Open, None) == 0)
        {
            return false;
        }
        ctx.set_open_event(OpenEvent::from_pointer(kind, event));
        let open_delay = get_delay(o.delay, DelayKind::Open, self.pointer_type);
        if open_delay > 0 {
            self.timeout.schedule(event.time, open_delay, Pending::Open);
        } else {
            ctx.request_open(true);
        }
        true
    }

    /// Run a one-shot leave session through the close intent. Returns `true`
    /// if it decided to close.
    fn evaluate_leave<H>(
        &mut self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        host: &mut H,
        event: &PointerEvent<E>,
    ) -> bool
    where
        H: Host<Element = E, Listener = L>,
    {
        if ctx.opened_by_click() {
            return false;
        }
        let Some(intent) = self.options.handle_close.as_ref() else {
            return false;
        };
        let mut session = intent.track(TrackStart {
            origin: event.position,
            leave: true,
        });
        let cx = track_context(ctx, tree, &*host);
        let sample = pointer_sample(ctx, &*host, event, true);
        let verdict = session.pointer_move(&cx, &sample);
        self.apply_intent(ctx, host, verdict, event.time);
        verdict == Intent::Close
    }

    fn apply_intent<H>(&mut self, ctx: &FloatingContext<E>, host: &mut H, verdict: Intent, now: u64)
    where
        H: Host<Element = E, Listener = L>,
    {
        match verdict {
            Intent::Keep => {}
            Intent::CloseAfter(ms) => self.intent_timer.schedule(now, ms, ()),
            Intent::Close => {
                self.cleanup_pointer_move(host);
                self.close_with_delay(ctx, now);
            }
        }
    }

    fn close_with_delay(&mut self, ctx: &FloatingContext<E>, now: u64) {
        let close_delay = get_delay(self.options.delay, DelayKind::Close, self.pointer_type);
        if close_delay > 0 && self.tracker.is_none() {
            self.timeout.schedule(now, close_delay, Pending::Close);
        } else {
            self.timeout.cancel();
            ctx.request_open(false);
        }
    }

    fn cleanup_pointer_move<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        if let Some(listener) = self.pointer_move.take() {
            host.unlisten(listener);
        }
        self.tracker = None;
        self.intent_timer.cancel();
    }

    fn subscribe_dismiss(&mut self, bus: &EventBus) {
        if self
            .dismiss_handler
            .as_ref()
            .is_some_and(|(b, _)| b.same_bus(bus))
        {
            return;
        }
        self.unsubscribe_dismiss();
        let flag = self.dismissed.clone();
        let id = bus.on(Topic::Dismiss, move |_| flag.set(true));
        self.dismiss_handler = Some((bus.clone(), id));
    }

    fn unsubscribe_dismiss(&mut self) {
        if let Some((bus, id)) = self.dismiss_handler.take() {
            bus.off(Topic::Dismiss, id);
        }
    }

    // Apply a dismissal recorded by the bus handler. Runs first in every entry
    // point, so no timer can fire between the emit and its cancellation.
    fn drain_dismiss(&mut self) {
        if self.dismissed.replace(false) {
            self.timeout.cancel();
            self.rest.cancel();
            self.intent_timer.cancel();
            self.block_mouse_move = true;
        }
    }

    fn block_pointer_events<H>(
        &mut self,
        ctx: &FloatingContext<E>,
        tree: Option<&FloatingTree<E>>,
        host: &mut H,
    ) where
        H: Host<Element = E, Listener = L>,
    {
        let parent_floating = match (tree, ctx.node_id) {
            (Some(tree), Some(id)) => tree
                .parent_of(id)
                .and_then(|p| p.context.as_ref())
                .and_then(|c| c.refs.floating),
            _ => None,
        };
        let reference = ctx.refs.event_reference();
        let key = (reference, ctx.refs.floating, parent_floating);
        if self.blocking.as_ref().is_some_and(|b| b.key == key) {
            return;
        }
        self.restore_pointer_events(host);

        let mut overrides = alloc::vec![(StyleTarget::Body, PointerEvents::None)];
        if let (Some(reference), Some(floating)) = (reference, ctx.refs.floating) {
            if let Some(parent) = parent_floating {
                overrides.push((StyleTarget::Element(parent), PointerEvents::Auto));
            }
            overrides.push((StyleTarget::Element(reference), PointerEvents::Auto));
            overrides.push((StyleTarget::Element(floating), PointerEvents::Auto));
        }
        let saved: Vec<_> = overrides
            .into_iter()
            .map(|(target, value)| {
                let previous = host.pointer_events(target);
                host.set_pointer_events(target, value);
                (target, previous)
            })
            .collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(overrides = saved.len(), "pointer events blocked");
        self.blocking = Some(Blocking { key, saved });
    }

    fn restore_pointer_events<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        let Some(blocking) = self.blocking.take() else {
            return;
        };
        for (target, value) in blocking.saved.into_iter().rev() {
            host.set_pointer_events(target, value);
        }
    }

    fn release<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E, Listener = L>,
    {
        self.cleanup_pointer_move(host);
        self.timeout.cancel();
        self.rest.cancel();
        self.restore_pointer_events(host);
        self.window_leave.teardown(host);
        self.unsubscribe_dismiss();
        self.dismissed.set(false);
    }
}

fn track_context<H: Host>(
    ctx: &FloatingContext<H::Element>,
    tree: Option<&FloatingTree<H::Element>>,
    host: &H,
) -> TrackContext {
    let open_descendant = match (tree, ctx.node_id) {
        (Some(tree), Some(id)) => tree.has_open_descendant(id),
        _ => false,
    };
    TrackContext {
        placement: ctx.placement,
        reference_rect: ctx
            .refs
            .event_reference()
            .and_then(|r| host.bounding_rect(r)),
        floating_rect: ctx.refs.floating.and_then(|f| host.bounding_rect(f)),
        open_descendant,
    }
}

fn pointer_sample<H: Host>(
    ctx: &FloatingContext<H::Element>,
    host: &H,
    event: &PointerEvent<H::Element>,
    is_leave: bool,
) -> PointerSample {
    PointerSample {
        position: event.position,
        pointer_type: event.pointer_type,
        over_floating: is_within(host, event.target, ctx.refs.floating),
        over_reference: is_within(host, event.target, ctx.refs.event_reference()),
        related_in_floating: is_within(host, event.related_target, ctx.refs.floating),
        is_leave,
    }
}
