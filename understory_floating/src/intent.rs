// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Close-intent strategy used by the hover controller.
//!
//! When the pointer leaves the reference element, the hover controller asks
//! its [`CloseIntent`] to start tracking. The returned [`IntentTracker`]
//! receives every subsequent document pointer move and decides whether the
//! pointer is still heading for the floating element. The tracker owns its
//! state. The controller owns the tracker and drops it when tracking ends.
//!
//! Trackers see pre-resolved inputs ([`TrackContext`], [`PointerSample`])
//! rather than the host, so they stay pure geometry.
//!
//! See [`SafePolygon`](crate::safe_polygon::SafePolygon) for the stock strategy.

use alloc::boxed::Box;

use kurbo::{Point, Rect};

use crate::context::Side;
use crate::input::PointerType;

/// How a tracking session started.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackStart {
    /// Pointer position where it left the element.
    pub origin: Point,
    /// The session evaluates a single `mouseleave` (for example after the
    /// page scrolled away under a still pointer) instead of following moves.
    pub leave: bool,
}

/// Geometry and tree state at the time of a pointer sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackContext {
    /// Side of the reference the floating element sits on.
    pub placement: Side,
    /// Reference bounds, if measurable.
    pub reference_rect: Option<Rect>,
    /// Floating bounds, if measurable.
    pub floating_rect: Option<Rect>,
    /// A nested floating element below this one is open.
    pub open_descendant: bool,
}

/// One pointer observation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Pointer position.
    pub position: Point,
    /// Device, if known.
    pub pointer_type: Option<PointerType>,
    /// The event target is inside the floating element.
    pub over_floating: bool,
    /// The event target is inside the reference element.
    pub over_reference: bool,
    /// For leave samples, the pointer went into the floating element.
    pub related_in_floating: bool,
    /// The sample is a `mouseleave` rather than a move.
    pub is_leave: bool,
}

/// Verdict for a pointer sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Keep the floating element open.
    Keep,
    /// Close now.
    Close,
    /// Close after this many milliseconds unless another sample arrives first.
    CloseAfter(u64),
}

/// Factory of tracking sessions.
pub trait CloseIntent: core::fmt::Debug {
    /// Whether pointer events elsewhere on the page are blocked while the
    /// floating element is open, so that every move reaches the tracker.
    fn blocks_pointer_events(&self) -> bool {
        true
    }

    /// Start a tracking session.
    fn track(&self, start: TrackStart) -> Box<dyn IntentTracker>;
}

/// A live tracking session.
pub trait IntentTracker: core::fmt::Debug {
    /// Judge one pointer sample.
    fn pointer_move(&mut self, cx: &TrackContext, sample: &PointerSample) -> Intent;
}
