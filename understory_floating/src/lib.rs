// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_floating --heading-base-level=0

//! Understory Floating: headless dismissal and hover-intent controllers for floating UI.
//!
//! ## Overview
//!
//! Tooltips, popovers and menus are floating elements anchored to a reference element.
//! This crate decides, from raw pointer, keyboard and scroll input plus a tree of nested floating elements,
//! when a floating element should open or close.
//! It suppresses false positives (moving into a nested submenu, pressing inside the floating content, pinch-zoom)
//! and false negatives (crossing the gap between reference and floating element on the way to it).
//!
//! It does not compute layout, store open state or render anything.
//!
//! ## Controllers
//!
//! - [`Dismiss`](crate::dismiss::Dismiss) closes on Escape, on a press outside, and on ancestor scroll,
//!   honoring bubbling rules across nested floating elements.
//! - [`Hover`](crate::hover::Hover) opens on hover with optional delay or rest debouncing and closes on leave,
//!   optionally through a [`CloseIntent`](crate::intent::CloseIntent) such as
//!   [`SafePolygon`](crate::safe_polygon::SafePolygon).
//!
//! Both read a shared [`FloatingContext`](crate::context::FloatingContext).
//! Neither changes the open state: they call [`FloatingContext::request_open`](crate::context::FloatingContext::request_open)
//! and the owner decides. The owner then calls each controller's `sync`.
//!
//! ## Host
//!
//! The controllers are sans-IO. Everything they need from the environment (containment, element bounds,
//! scrollable ancestors, listener attach/detach, `pointer-events` styles) goes through the [`Host`](crate::host::Host) trait.
//! Time is a millisecond timestamp carried on every event. Timers fire when the host calls `poll`.
//!
//! ## Workflow
//!
//! 1) Build a [`FloatingContext`](crate::context::FloatingContext) per floating element and register it in a
//!    [`FloatingTree`](crate::tree::FloatingTree) when elements nest.
//! 2) Merge each controller's `props()` into the element handler sets and route events to the controller methods.
//! 3) On every open or refs change, update the context and call `sync`.
//! 4) Call `poll` at or after the earliest `next_deadline`.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_floating::context::FloatingContext;
//! use understory_floating::delay::Delay;
//! use understory_floating::hover::{Hover, HoverOptions};
//! use understory_floating::input::PointerEvent;
//!
//! let requested = Rc::new(Cell::new(None));
//! let sink = requested.clone();
//! let ctx: FloatingContext<u32> = FloatingContext::new(move |open| sink.set(Some(open)));
//!
//! let mut hover: Hover<u32, u32> = Hover::new(HoverOptions {
//!     delay: Delay::Uniform(100),
//!     ..HoverOptions::default()
//! });
//! hover.on_reference_mouse_enter(&ctx, &PointerEvent::mouse(Point::new(5.0, 5.0), 0));
//! // Nothing yet: the open waits for the delay.
//! assert_eq!(requested.get(), None);
//! assert_eq!(hover.next_deadline(), Some(100));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` debug events at open/close requests and listener changes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod context;
pub mod delay;
pub mod dismiss;
pub mod effect;
pub mod events;
pub mod host;
pub mod hover;
pub mod input;
pub mod intent;
pub mod safe_polygon;
pub mod timer;
pub mod tree;

#[cfg(test)]
mod test_host;

pub use delay::get_delay;
pub use tree::get_children;
