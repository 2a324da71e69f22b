// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dismissing a nested menu stack.
//!
//! A menu opens a submenu. With `bubbles: false`, Escape closes only the
//! innermost open element; the parent defers while a child is registered.
//! A press inside the submenu is not an outside press for the parent.
//!
//! Run:
//! - `cargo run -p understory_demos --example dismiss_nested`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_demos::Page;
use understory_floating::context::FloatingContext;
use understory_floating::dismiss::{Dismiss, DismissOptions};
use understory_floating::events::Topic;
use understory_floating::input::{Key, KeyEvent, PointerEvent};
use understory_floating::tree::{FloatingTree, NodeId, TreeNode};

struct Floating {
    name: &'static str,
    ctx: FloatingContext<u32>,
    dismiss: Dismiss<u32, u32>,
    requested: Rc<Cell<Option<bool>>>,
}

impl Floating {
    fn new(name: &'static str, node: u64, reference: u32, floating: u32) -> Self {
        let requested = Rc::new(Cell::new(None));
        let sink = requested.clone();
        let mut ctx = FloatingContext::new(move |open| sink.set(Some(open)));
        ctx.open = true;
        ctx.node_id = Some(NodeId(node));
        ctx.refs.reference = Some(reference);
        ctx.refs.floating = Some(floating);
        let dismiss = Dismiss::new(DismissOptions {
            bubbles: false,
            ancestor_scroll: true,
            ..DismissOptions::default()
        });
        Self {
            name,
            ctx,
            dismiss,
            requested,
        }
    }

    /// Apply a pending open-change request, as the owning component would.
    fn commit(&mut self, page: &mut Page) {
        if let Some(open) = self.requested.take() {
            println!("{} -> open: {open}", self.name);
            self.ctx.open = open;
        }
        self.dismiss.sync(&self.ctx, page);
    }
}

fn snapshot(menu: &Floating, submenu: Option<&Floating>) -> FloatingTree<u32> {
    let mut nodes = vec![TreeNode::new(NodeId(1), None).with_context(menu.ctx.clone())];
    if let Some(sub) = submenu {
        nodes.push(TreeNode::new(NodeId(2), Some(NodeId(1))).with_context(sub.ctx.clone()));
    }
    FloatingTree::from_nodes(nodes)
}

fn main() {
    let mut page = Page::default();
    let scroller = page.add("scroller", Rect::new(0.0, 0.0, 800.0, 600.0), None, true);
    let button = page.add("button", Rect::new(20.0, 20.0, 100.0, 44.0), Some(scroller), false);
    let menu_el = page.add("menu", Rect::new(20.0, 48.0, 180.0, 200.0), None, false);
    let item = page.add("item", Rect::new(20.0, 60.0, 180.0, 84.0), Some(menu_el), false);
    let submenu_el = page.add("submenu", Rect::new(184.0, 60.0, 340.0, 160.0), None, false);

    let mut menu = Floating::new("menu", 1, button, menu_el);
    let mut submenu = Floating::new("submenu", 2, item, submenu_el);
    submenu.ctx.events.on(Topic::Dismiss, |payload| {
        println!("submenu bus: dismiss (prevent_scroll: {})", payload.prevent_scroll());
    });

    println!("open both:");
    menu.commit(&mut page);
    submenu.commit(&mut page);

    println!("press inside the submenu:");
    let press = PointerEvent::mouse(Point::new(200.0, 100.0), 10);
    let press = match page.hit(press.position) {
        Some(target) => press.with_target(target),
        None => press,
    };
    println!("  target: {}", press.target.map_or("none", |t| page.name(t)));
    let tree = snapshot(&menu, Some(&submenu));
    menu.dismiss.on_document_pointer_down(&menu.ctx, Some(&tree), &page, &press);
    menu.commit(&mut page);

    println!("Escape:");
    let escape = KeyEvent {
        key: Key::Escape,
        time: 20,
    };
    submenu.dismiss.on_key_down(&submenu.ctx, Some(&tree), &escape);
    menu.dismiss.on_key_down(&menu.ctx, Some(&tree), &escape);
    submenu.commit(&mut page);
    menu.commit(&mut page);

    println!("submenu unmounts, Escape again:");
    submenu.dismiss.teardown(&mut page);
    let tree = snapshot(&menu, None);
    menu.dismiss.on_key_down(&menu.ctx, Some(&tree), &escape);
    menu.commit(&mut page);

    println!("listeners left: {}", page.listeners().count());
}
