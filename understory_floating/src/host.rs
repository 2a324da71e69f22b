// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host environment seen by the controllers.
//!
//! Controllers never hold element references or install callbacks
//! themselves. They ask a [`Host`] to answer geometry and containment
//! questions, to attach and detach listeners, and to change pointer-events
//! styles. The host then routes each event fired on an attached listener back
//! to the controller method of the same name.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::input::EventKind;

/// Where a listener is attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget<E> {
    /// The document.
    Document,
    /// The document's root element.
    DocumentElement,
    /// The window.
    Window,
    /// The visual viewport. Scrolling it is how pinch-zoom pans.
    VisualViewport,
    /// An element.
    Element(E),
}

/// Options for [`Host::listen`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// The listener never cancels the event.
    pub passive: bool,
}

/// Value of the `pointer-events` style property.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerEvents {
    /// No inline value; inherited or stylesheet value applies.
    #[default]
    Unset,
    /// `none`
    None,
    /// `auto`
    Auto,
}

/// Element whose `pointer-events` style can be overridden.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleTarget<E> {
    /// The document body.
    Body,
    /// An element.
    Element(E),
}

/// Environment the controllers operate in.
///
/// All operations are infallible. An element the host cannot measure
/// yields `None` from [`Host::bounding_rect`], and the caller skips the
/// feature that needed it.
pub trait Host {
    /// Element handle.
    type Element: Copy + Eq + core::fmt::Debug;
    /// Handle of an attached listener.
    type Listener: Copy + Eq + core::fmt::Debug;

    /// True if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, node: Self::Element) -> bool;

    /// Bounding rectangle of `element` in viewport coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Option<Rect>;

    /// Scrollable ancestors of `element`, nearest first.
    ///
    /// May include [`EventTarget::Window`] and [`EventTarget::VisualViewport`].
    fn overflow_ancestors(&self, element: Self::Element) -> Vec<EventTarget<Self::Element>>;

    /// Attach a listener for `kind` on `target`.
    fn listen(
        &mut self,
        target: EventTarget<Self::Element>,
        kind: EventKind,
        options: ListenOptions,
    ) -> Self::Listener;

    /// Detach a listener previously returned by [`Host::listen`].
    fn unlisten(&mut self, listener: Self::Listener);

    /// Current inline `pointer-events` value of `target`.
    fn pointer_events(&self, target: StyleTarget<Self::Element>) -> PointerEvents;

    /// Set the inline `pointer-events` value of `target`.
    fn set_pointer_events(&mut self, target: StyleTarget<Self::Element>, value: PointerEvents);
}

/// True if `target` is inside `container`. Missing handles are never inside.
pub fn is_within<H: Host>(
    host: &H,
    target: Option<H::Element>,
    container: Option<H::Element>,
) -> bool {
    match (target, container) {
        (Some(target), Some(container)) => host.contains(container, target),
        _ => false,
    }
}
