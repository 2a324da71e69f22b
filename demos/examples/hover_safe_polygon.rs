// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover with an open delay and a safe polygon.
//!
//! The pointer enters a button, the popover opens after the delay, and the
//! pointer leaves the button heading diagonally for the popover. The safe
//! polygon keeps it open along the way; veering off closes it.
//!
//! Run:
//! - `cargo run -p understory_demos --example hover_safe_polygon`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_demos::Page;
use understory_floating::context::FloatingContext;
use understory_floating::delay::Delay;
use understory_floating::hover::{Hover, HoverOptions};
use understory_floating::input::PointerEvent;
use understory_floating::safe_polygon::SafePolygon;

fn main() {
    let mut page = Page::default();
    let button = page.add("button", Rect::new(100.0, 100.0, 140.0, 120.0), None, false);
    let popover = page.add("popover", Rect::new(80.0, 140.0, 200.0, 200.0), None, false);

    let requested = Rc::new(Cell::new(None));
    let sink = requested.clone();
    let mut ctx = FloatingContext::new(move |open| sink.set(Some(open)));
    ctx.refs.reference = Some(button);
    ctx.refs.floating = Some(popover);

    let mut hover: Hover<u32, u32> = Hover::new(HoverOptions {
        delay: Delay::Split {
            open: Some(100),
            close: None,
        },
        handle_close: Some(Box::new(SafePolygon::default())),
        ..HoverOptions::default()
    });
    hover.sync(&ctx, None, &mut page);

    let at = |page: &Page, x: f64, y: f64, time: u64| {
        let event = PointerEvent::mouse(Point::new(x, y), time);
        match page.hit(event.position) {
            Some(target) => event.with_target(target),
            None => event,
        }
    };
    let commit = |ctx: &mut FloatingContext<u32>, hover: &mut Hover<u32, u32>, page: &mut Page| {
        if let Some(open) = requested.take() {
            println!("popover -> open: {open}");
            ctx.open = open;
        }
        hover.sync(ctx, None, page);
    };

    println!("enter the button at t=0:");
    let enter = at(&page, 110.0, 110.0, 0);
    hover.on_reference_pointer(&enter);
    hover.on_reference_mouse_enter(&ctx, &enter);
    println!("  next deadline: {:?}", hover.next_deadline());

    println!("poll at t=100:");
    hover.poll(&ctx, &mut page, 100);
    commit(&mut ctx, &mut hover, &mut page);

    println!("leave through the right edge:");
    let leave = at(&page, 140.0, 115.0, 150);
    hover.on_reference_mouse_leave(&ctx, None, &mut page, &leave);
    println!("  tracking: {}", hover.is_tracking());

    for (x, y, t) in [(150.0, 125.0, 160), (165.0, 132.0, 170), (185.0, 110.0, 180)] {
        let step = at(&page, x, y, t);
        hover.on_document_pointer_move(&ctx, None, &mut page, &step);
        println!("  move to ({x}, {y}): tracking {}", hover.is_tracking());
        commit(&mut ctx, &mut hover, &mut page);
    }

    hover.teardown(&mut page);
    println!("listeners left: {}", page.listeners().count());
}
