// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Safe-polygon close intent.
//!
//! Keeps a hover-opened floating element open while the pointer travels from
//! the reference toward it, even across empty space. Two regions count as
//! safe:
//!
//! - the rectangular trough between the facing edges of the reference and the
//!   floating element;
//! - the convex hull of a small square around the leave point and the
//!   floating element's near edge. A pointer heading for the floating element
//!   stays inside it.
//!
//! Leaving the reference through the side opposite the floating element
//! closes at once. So does wandering off after having reached the floating
//! element.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_floating::context::Side;
//! use understory_floating::intent::{CloseIntent, Intent, PointerSample, TrackContext, TrackStart};
//! use understory_floating::safe_polygon::SafePolygon;
//!
//! let cx = TrackContext {
//!     placement: Side::Bottom,
//!     reference_rect: Some(Rect::new(100.0, 100.0, 140.0, 120.0)),
//!     floating_rect: Some(Rect::new(80.0, 140.0, 200.0, 200.0)),
//!     open_descendant: false,
//! };
//! let mut tracker = SafePolygon::default().track(TrackStart {
//!     origin: Point::new(140.0, 115.0),
//!     leave: false,
//! });
//! let sample = |x, y| PointerSample {
//!     position: Point::new(x, y),
//!     pointer_type: None,
//!     over_floating: false,
//!     over_reference: false,
//!     related_in_floating: false,
//!     is_leave: false,
//! };
//! // Heading down toward the floating element.
//! assert_eq!(tracker.pointer_move(&cx, &sample(150.0, 125.0)), Intent::Keep);
//! // Veering up and away.
//! assert_eq!(tracker.pointer_move(&cx, &sample(180.0, 110.0)), Intent::Close);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Shape};

use crate::context::Side;
use crate::input::PointerType;
use crate::intent::{CloseIntent, Intent, IntentTracker, PointerSample, TrackContext, TrackStart};

/// Safe-polygon options.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SafePolygon {
    /// Extra room around the leave point, in pixels.
    pub buffer: f64,
    /// If non-zero, a pointer that rests inside the polygon without reaching
    /// the floating element closes it after this many milliseconds.
    pub rest_ms: u64,
    /// Block page pointer events while open. See
    /// [`CloseIntent::blocks_pointer_events`].
    pub block_pointer_events: bool,
}

impl Default for SafePolygon {
    fn default() -> Self {
        Self {
            buffer: 0.5,
            rest_ms: 0,
            block_pointer_events: true,
        }
    }
}

impl CloseIntent for SafePolygon {
    fn blocks_pointer_events(&self) -> bool {
        self.block_pointer_events
    }

    fn track(&self, start: TrackStart) -> Box<dyn IntentTracker> {
        Box::new(SafePolygonTracker {
            options: *self,
            origin: start.origin,
            has_landed: false,
        })
    }
}

#[derive(Debug)]
struct SafePolygonTracker {
    options: SafePolygon,
    origin: Point,
    has_landed: bool,
}

impl IntentTracker for SafePolygonTracker {
    fn pointer_move(&mut self, cx: &TrackContext, sample: &PointerSample) -> Intent {
        if sample.pointer_type.is_some_and(|p| p != PointerType::Mouse) {
            return Intent::Keep;
        }
        if sample.over_floating {
            self.has_landed = true;
            if !sample.is_leave {
                return Intent::Keep;
            }
        }
        if sample.over_reference && !sample.is_leave {
            self.has_landed = false;
            return Intent::Keep;
        }
        if sample.is_leave && sample.related_in_floating {
            return Intent::Keep;
        }
        if cx.open_descendant {
            return Intent::Keep;
        }
        let (Some(reference), Some(floating)) = (cx.reference_rect, cx.floating_rect) else {
            return Intent::Keep;
        };

        if left_from_opposite_side(cx.placement, self.origin, reference) {
            return Intent::Close;
        }
        let p = sample.position;
        if in_trough(cx.placement, reference, floating, p) {
            return Intent::Keep;
        }
        if self.has_landed && !contains_inclusive(reference, p) {
            return Intent::Close;
        }
        if !self.polygon(cx.placement, floating).contains(p) {
            return Intent::Close;
        }
        if !self.has_landed && self.options.rest_ms > 0 {
            Intent::CloseAfter(self.options.rest_ms)
        } else {
            Intent::Keep
        }
    }
}

impl SafePolygonTracker {
    fn polygon(&self, side: Side, floating: Rect) -> BezPath {
        let pad = self.options.buffer + 1.0;
        let o = self.origin;
        let (a, b) = near_edge(side, floating);
        let hull = convex_hull(alloc::vec![
            Point::new(o.x - pad, o.y - pad),
            Point::new(o.x + pad, o.y - pad),
            Point::new(o.x + pad, o.y + pad),
            Point::new(o.x - pad, o.y + pad),
            a,
            b,
        ]);
        let mut path = BezPath::new();
        let mut points = hull.into_iter();
        if let Some(first) = points.next() {
            path.move_to(first);
            for p in points {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }
}

/// Endpoints of the floating element's edge that faces the reference.
fn near_edge(side: Side, floating: Rect) -> (Point, Point) {
    match side {
        Side::Top => (
            Point::new(floating.x0, floating.y1),
            Point::new(floating.x1, floating.y1),
        ),
        Side::Bottom => (
            Point::new(floating.x0, floating.y0),
            Point::new(floating.x1, floating.y0),
        ),
        Side::Left => (
            Point::new(floating.x1, floating.y0),
            Point::new(floating.x1, floating.y1),
        ),
        Side::Right => (
            Point::new(floating.x0, floating.y0),
            Point::new(floating.x0, floating.y1),
        ),
    }
}

// One pixel of slack absorbs rounding of fractional layouts.
fn left_from_opposite_side(side: Side, origin: Point, reference: Rect) -> bool {
    match side {
        Side::Top => origin.y >= reference.y1 - 1.0,
        Side::Bottom => origin.y <= reference.y0 + 1.0,
        Side::Left => origin.x >= reference.x1 - 1.0,
        Side::Right => origin.x <= reference.x0 + 1.0,
    }
}

fn in_trough(side: Side, reference: Rect, floating: Rect, p: Point) -> bool {
    let narrow_x = if floating.width() > reference.width() {
        reference
    } else {
        floating
    };
    let narrow_y = if floating.height() > reference.height() {
        reference
    } else {
        floating
    };
    let (x0, x1, y0, y1) = match side {
        Side::Top => (narrow_x.x0, narrow_x.x1, floating.y1 - 1.0, reference.y0 + 1.0),
        Side::Bottom => (narrow_x.x0, narrow_x.x1, reference.y1 - 1.0, floating.y0 + 1.0),
        Side::Left => (floating.x1 - 1.0, reference.x0 + 1.0, narrow_y.y0, narrow_y.y1),
        Side::Right => (reference.x1 - 1.0, floating.x0 + 1.0, narrow_y.y0, narrow_y.y1),
    };
    p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
}

fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Andrew's monotone chain; counter-clockwise in y-down coordinates is fine,
/// winding only needs a simple closed loop.
fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }
    let cross = |o: Point, a: Point, b: Point| (a - o).cross(b - o);
    let mut lower: Vec<Point> = Vec::with_capacity(points.len());
    for &p in &points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
